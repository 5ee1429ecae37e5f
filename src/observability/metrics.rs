//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): proxy requests by method, status, outcome
//! - `relay_request_duration_seconds` (histogram): time to response head
//!
//! `outcome` is `relayed` or the error kind (`timeout`, `domain_not_allowed`, ...).

use axum::http::{Method, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one proxy request.
pub fn record_request(method: &Method, status: StatusCode, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.as_u16().to_string(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
