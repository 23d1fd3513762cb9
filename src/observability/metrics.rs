//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by outcome, status
//! - `relay_request_duration_seconds` (histogram): latency by outcome
//! - `relay_upstream_calls_total` (counter): outbound calls by status

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled inbound request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound call; `status` is the HTTP status or `"error"`.
pub fn record_upstream_call(status: &str) {
    metrics::counter!("relay_upstream_calls_total", "status" => status.to_string()).increment(1);
}
