//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, upstream outcomes, retries, sessions)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_retries_total` (counter): retry attempts by operation
//! - `gateway_upstream_calls_total` (counter): executor outcomes by operation
//! - `gateway_credential_refresh_total` (counter): refreshes by outcome
//! - `gateway_session_locked` (gauge): 1=locked, 0=open
//! - `gateway_screening_total` (counter): screenings by kind and risk tier
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Recording before `init_metrics` is a silent no-op, which keeps tests quiet

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("gateway_requests_total", &labels).increment(1);
    histogram!("gateway_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record one scheduled retry of an upstream operation.
pub fn record_retry(operation: &str, error_code: &'static str) {
    counter!(
        "gateway_upstream_retries_total",
        "operation" => operation.to_string(),
        "error_code" => error_code
    )
    .increment(1);
}

/// Record the final outcome of an executor run.
pub fn record_upstream_outcome(operation: &str, outcome: &'static str, attempts: u32) {
    counter!(
        "gateway_upstream_calls_total",
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gateway_upstream_attempts", "operation" => operation.to_string())
        .record(f64::from(attempts));
}

/// Record a credential refresh attempt.
pub fn record_credential_refresh(outcome: &'static str) {
    counter!("gateway_credential_refresh_total", "outcome" => outcome).increment(1);
}

/// Record the session lock state.
pub fn record_session_locked(locked: bool) {
    gauge!("gateway_session_locked").set(if locked { 1.0 } else { 0.0 });
}

/// Record a completed screening and its overall risk tier.
pub fn record_screening(kind: &'static str, risk: &'static str) {
    counter!("gateway_screening_total", "kind" => kind, "risk" => risk).increment(1);
}
