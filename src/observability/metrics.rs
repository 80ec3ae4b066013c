//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): served requests by method, status
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `proxy_token_refreshes_total` (counter): metadata-service token fetches

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one served request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.clone(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "proxy_request_duration_seconds",
        "method" => method,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one token refresh against the metadata service.
pub fn record_token_refresh() {
    metrics::counter!("proxy_token_refreshes_total").increment(1);
}
