//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by path, method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_backend_calls_total` (counter): RPC calls by service, method, outcome
//! - `gateway_auth_failures_total` (counter): rejected tokens by reason
//!
//! All recording functions are no-ops until a recorder is installed, so
//! tests and metric-less deployments pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed (or abandoned) inbound request.
pub fn record_request(path: &str, method: &str, status: &str, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "path" => path.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "path" => path.to_string(),
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one backend RPC.
pub fn record_backend_call(service: &'static str, method: &'static str, ok: bool) {
    metrics::counter!(
        "gateway_backend_calls_total",
        "service" => service,
        "method" => method,
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}

/// Record a rejected bearer token.
pub fn record_auth_failure(reason: &'static str) {
    metrics::counter!("gateway_auth_failures_total", "reason" => reason).increment(1);
}
