//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): dispatched requests by method, status, service
//! - `gateway_request_duration_seconds` (histogram): dispatch latency by service
//! - `gateway_backend_health` (gauge): 1=healthy, 0=unhealthy or unreachable
//! - `gateway_probe_duration_seconds` (histogram): liveness probe latency
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::ProbeStatus;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, service: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "service" => service.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_probe(service: &str, status: ProbeStatus, latency: Duration) {
    let healthy = if status == ProbeStatus::Healthy { 1.0 } else { 0.0 };
    gauge!("gateway_backend_health", "service" => service.to_string()).set(healthy);
    histogram!("gateway_probe_duration_seconds", "service" => service.to_string())
        .record(latency.as_secs_f64());
}
