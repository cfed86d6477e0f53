//! API middleware

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

/// Header carrying the request id assigned by the request-id layer
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Audit logging middleware
///
/// One line per API request. Server-side failures (ledger or printer outages)
/// are raised to `warn`.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Utc::now();

    let response = next.run(request).await;

    let elapsed_ms = (Utc::now() - start).num_milliseconds();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(%method, %uri, %request_id, status, elapsed_ms, "API request failed");
    } else {
        info!(%method, %uri, %request_id, status, elapsed_ms, "API request");
    }

    response
}
