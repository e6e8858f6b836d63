//! On-demand health aggregation.
//!
//! # Responsibilities
//! - Probe every registered backend concurrently
//! - Bound each probe by its own deadline
//! - Join all probes into one report

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Method, Request};
use futures_util::future::join_all;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::error::error_chain;
use crate::health::report::{HealthReport, ProbeStatus, ServiceHealth};
use crate::observability::metrics;
use crate::routing::{ServiceEntry, ServiceRegistry};

const PROBE_USER_AGENT: &str = concat!("evid-gateway-health-check/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HealthAggregator {
    registry: Arc<ServiceRegistry>,
    client: Client<HttpConnector, Body>,
    probe_path: String,
    deadline: Duration,
}

impl HealthAggregator {
    pub fn new(registry: Arc<ServiceRegistry>, probe_path: impl Into<String>, deadline: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            registry,
            client,
            probe_path: probe_path.into(),
            deadline,
        }
    }

    /// Probe every service and return once all probes have settled.
    ///
    /// Total latency is bounded by the probe deadline, not by the number of
    /// services.
    pub async fn check_all(&self) -> HealthReport {
        let probes = self.registry.all().iter().map(|entry| async move {
            let health = self.probe(entry).await;
            (entry.name().to_string(), health)
        });

        let report = HealthReport::new(join_all(probes).await);

        tracing::debug!(
            services = report.len(),
            healthy = report.count(ProbeStatus::Healthy),
            "Health check complete"
        );
        report
    }

    async fn probe(&self, entry: &ServiceEntry) -> ServiceHealth {
        let uri = format!("{}{}", entry.base_address(), self.probe_path);

        let request = match Request::builder()
            .method(Method::GET)
            .uri(&uri)
            .header(header::USER_AGENT, PROBE_USER_AGENT)
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(service = %entry.name(), uri = %uri, error = %e, "Failed to build health check request");
                return ServiceHealth::unreachable(Duration::ZERO, format!("invalid probe request: {}", e));
            }
        };

        let started = Instant::now();
        let outcome = time::timeout(self.deadline, self.client.request(request)).await;
        let latency = started.elapsed();

        let health = match outcome {
            Ok(Ok(response)) => {
                let health = ServiceHealth::from_status(response.status().as_u16(), latency);
                if health.status == ProbeStatus::Unhealthy {
                    tracing::warn!(service = %entry.name(), status = %response.status(), "Health check failed: non-success status");
                }
                health
            }
            Ok(Err(e)) => {
                let detail = error_chain(&e);
                tracing::warn!(service = %entry.name(), uri = %uri, error = %detail, "Health check failed: connection error");
                ServiceHealth::unreachable(latency, detail)
            }
            Err(_) => {
                tracing::warn!(service = %entry.name(), uri = %uri, "Health check failed: timeout");
                ServiceHealth::unreachable(latency, format!("timed out after {:?}", self.deadline))
            }
        };

        metrics::record_probe(entry.name(), health.status, latency);
        health
    }
}
