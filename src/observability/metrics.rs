//! Metrics collection and exposition.
//!
//! # Metrics
//! - `guard_requests_total` (counter): requests by method, status, class
//! - `guard_request_duration_seconds` (histogram): latency by class
//! - `guard_rate_limited_total` (counter): rejections by class
//! - `guard_validation_failures_total` (counter): failed fields by schema
//! - `guard_csrf_rejections_total` (counter): double-submit failures

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to bind is logged, not fatal: the service runs without
/// exposition rather than refusing traffic.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, class: &str, start: Instant) {
    counter!(
        "guard_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "class" => class.to_string()
    )
    .increment(1);
    histogram!("guard_request_duration_seconds", "class" => class.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(class: &str) {
    counter!("guard_rate_limited_total", "class" => class.to_string()).increment(1);
}

pub fn record_validation_failure(schema: &str, failed_fields: usize) {
    counter!("guard_validation_failures_total", "schema" => schema.to_string())
        .increment(failed_fields as u64);
}

pub fn record_csrf_rejection() {
    counter!("guard_csrf_rejections_total").increment(1);
}
