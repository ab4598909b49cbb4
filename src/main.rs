//! ConnectHub server
//!
//! Main application entry point

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use ConnectHub::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseService, PoolConfig},
    handlers::{router, AppState},
    services::ServiceFactory,
    utils::logging,
};

/// How often idle rate-limit entries are dropped
const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ConnectHub::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&PoolConfig::from(&settings.database))
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&pool).await?;
    let db = DatabaseService::new(pool);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, db.clone())?;
    services.uploads.ensure_directory().await?;

    match services.cache.health_check().await {
        Some(true) => info!("Redis cache connected"),
        Some(false) => warn!("Redis cache unreachable, public pages will be served uncached"),
        None => info!("Redis cache disabled"),
    }

    if settings.features.seed_on_startup {
        let report = services.content.seed().await?;
        info!(seeded = report.total(), "Startup seeding finished");
    }

    let address = settings.bind_address();
    let state = AppState::new(settings, db, services)?;

    let limiter = state.limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });

    let app = router(state);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "HTTP server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
