//! Audit logging middleware.
//!
//! Logs every request with method, path, response status and latency.
//! Request bodies carry health data and are never logged.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, "Request failed");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, "Request handled");
    }

    response
}
