//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ConnectHub application.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{ConnectHubError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "connect_hub.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(stdout_layer)
        .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
        .try_init()
        .map_err(|e| ConnectHubError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log admin actions
pub fn log_admin_action(admin: &str, action: &str, resource: &str, target: Option<&str>) {
    warn!(
        admin = admin,
        action = action,
        resource = resource,
        target = target,
        "Admin action performed"
    );
}

/// Log registration wizard progress
pub fn log_registration_step(submission_id: &str, step: u8, success: bool, details: Option<&str>) {
    if success {
        info!(
            submission_id = submission_id,
            step = step,
            details = details,
            "Registration step saved"
        );
    } else {
        warn!(
            submission_id = submission_id,
            step = step,
            details = details,
            "Registration step rejected"
        );
    }
}

/// Log a failed call to the ConnectHub API
pub fn log_api_error(endpoint: &str, error: &str, status: Option<u16>) {
    error!(
        endpoint = endpoint,
        error = error,
        status = status,
        "API error occurred"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}

/// Log cache hits and misses
pub fn log_cache_access(key: &str, hit: bool) {
    debug!(key = key, hit = hit, "Cache access");
}
