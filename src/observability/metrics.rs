//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dialer_requests_total` (counter): requests by method, status
//! - `dialer_request_duration_seconds` (histogram): latency by method
//! - `dialer_changes_total` (counter): accepted dial mutations
//! - `dialer_countdown_expired_total` (counter): countdowns that ran out
//! - `dialer_document_errors_total` (counter): document failures by kind
//!
//! Recording is always safe; without an installed exporter the calls are
//! no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "dialer_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("dialer_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_dial_change() {
    metrics::counter!("dialer_changes_total").increment(1);
}

pub fn record_countdown_expired() {
    metrics::counter!("dialer_countdown_expired_total").increment(1);
}

pub fn record_document_error(kind: &'static str) {
    metrics::counter!("dialer_document_errors_total", "kind" => kind).increment(1);
}
