//! Request identification and accounting.
//!
//! # Responsibilities
//! - Assign a UUID `x-request-id` to every request that lacks one
//! - Echo the id back on the response
//! - Record request count and latency per method and status
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Ids come from tower-http's request-id layers, not a hand-rolled layer

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::observability::metrics;

pub const X_REQUEST_ID: &str = "x-request-id";

fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Generates ids for requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(request_id_header(), MakeRequestUuid)
}

/// Copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(request_id_header())
}

/// Read the request id assigned by [`set_request_id_layer`].
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Middleware: log and count every request.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let id = request_id(&request).to_string();

    let response = next.run(request).await;
    let status = response.status().as_u16();

    tracing::debug!(
        request_id = %id,
        method = %method,
        path = %path,
        status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    metrics::record_request(&method, status, start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_fallback() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(request_id(&request), "unknown");

        let request = Request::builder()
            .header(X_REQUEST_ID, "abc")
            .body(())
            .unwrap();
        assert_eq!(request_id(&request), "abc");
    }
}
