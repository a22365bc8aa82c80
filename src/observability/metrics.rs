//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests by module, verb, outcome
//! - `dispatch_request_duration_seconds` (histogram): time spent per request
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Outcome labels: redirect, html, json, fallback, committed, error

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_dispatch(module: &str, verb: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!(
        "dispatch_requests_total",
        "module" => module.to_string(),
        "verb" => verb,
        "outcome" => outcome,
    )
    .increment(1);

    ::metrics::histogram!(
        "dispatch_request_duration_seconds",
        "module" => module.to_string(),
        "verb" => verb,
    )
    .record(start.elapsed().as_secs_f64());
}
