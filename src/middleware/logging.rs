//! Logging middleware
//!
//! Records one structured line per HTTP request with its method, path,
//! response status and latency. Slow requests and server errors are raised
//! to `warn`/`error`.

use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Requests slower than this are logged as warnings
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_millis(1_000);

/// Log the outcome of every request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let latency = started.elapsed();
    let status = response.status();
    let latency_ms = latency.as_millis() as u64;

    if status.is_server_error() {
        error!(method = %method, path = %path, status = status.as_u16(), latency_ms = latency_ms, "Request failed");
    } else if latency > SLOW_REQUEST_THRESHOLD {
        warn!(method = %method, path = %path, status = status.as_u16(), latency_ms = latency_ms, "Slow request");
    } else {
        info!(method = %method, path = %path, status = status.as_u16(), latency_ms = latency_ms, "Request handled");
    }

    response
}
