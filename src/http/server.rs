//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with operator endpoints and the dispatch fallback
//! - Wire up middleware (tracing, optional CORS)
//! - Serve over plaintext or TLS with graceful shutdown
//! - Dispatch requests: route, forward, relay or map the failure

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    response::{IntoResponse, Response},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::admin;
use crate::config::{CorsConfig, GatewayConfig};
use crate::error::GatewayError;
use crate::health::HealthAggregator;
use crate::http::forward::Forwarder;
use crate::http::request::RequestId;
use crate::observability::metrics;
use crate::routing::{match_route, RegistryError, ServiceRegistry};

/// How long in-flight requests may drain after a shutdown signal (TLS listener).
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub forwarder: Forwarder,
    pub health: HealthAggregator,
    pub api_prefix: Arc<str>,
    pub environment: Arc<str>,
}

impl AppState {
    /// Build the registry and both outbound clients from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, RegistryError> {
        let registry = Arc::new(ServiceRegistry::new(&config.services)?);

        let forwarder = Forwarder::new(
            Duration::from_secs(config.timeouts.connect_secs),
            Duration::from_secs(config.timeouts.request_secs),
        );
        let health = HealthAggregator::new(
            registry.clone(),
            config.health_check.path.clone(),
            Duration::from_secs(config.health_check.timeout_secs),
        );

        Ok(Self {
            registry,
            forwarder,
            health,
            api_prefix: Arc::from(config.routing.api_prefix.as_str()),
            environment: Arc::from(config.observability.environment.as_str()),
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server. Fails if the service registry is inconsistent.
    pub fn new(config: GatewayConfig) -> Result<Self, RegistryError> {
        let state = AppState::from_config(&config)?;

        tracing::info!(
            services = ?state.registry.names(),
            api_prefix = %state.api_prefix,
            "Service registry loaded"
        );

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let router = admin::operator_routes()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if config.cors.enabled {
            router.layer(cors_layer(&config.cors))
        } else {
            router
        }
    }

    /// Run the server on a plaintext listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = axum_server::Handle::new();

        let signal_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received, draining connections");
            signal_handle.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn into_router(self) -> Router {
        self.router
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allow_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Dispatch handler for every path not claimed by an operator endpoint.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = RequestId::from_headers(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Request received"
    );

    let Some(route) = match_route(&path, &state.registry, &state.api_prefix) else {
        let err = GatewayError::RouteNotFound { path };
        err.log(request_id.as_str());
        metrics::record_request(method.as_str(), err.status().as_u16(), "none", start_time);
        return err.into_response();
    };

    let service = route.service.name();
    tracing::debug!(
        request_id = %request_id,
        service = %service,
        residual_path = %route.residual_path,
        "Request routed"
    );

    match state.forwarder.forward(&route, request).await {
        Ok(response) => {
            metrics::record_request(method.as_str(), response.status().as_u16(), service, start_time);
            tracing::debug!(
                request_id = %request_id,
                service = %service,
                status = %response.status(),
                elapsed = ?start_time.elapsed(),
                "Request completed"
            );
            response
        }
        Err(err) => {
            err.log(request_id.as_str());
            metrics::record_request(method.as_str(), err.status().as_u16(), service, start_time);
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn router(services: Vec<ServiceConfig>) -> Router {
        let mut config = GatewayConfig::default();
        config.services = services;
        HttpServer::new(config).unwrap().into_router()
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unmatched_path_is_not_found() {
        let (status, body) = get(router(GatewayConfig::default().services), "/unknown/thing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "detail": "Not Found" }));
    }

    #[tokio::test]
    async fn status_lists_registered_services() {
        let services = vec![
            ServiceConfig::new("auth", "http://127.0.0.1:1"),
            ServiceConfig::new("files", "http://127.0.0.1:2"),
        ];
        let (status, body) = get(router(services), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Evid Flow MEAL Automation Suite - API Gateway");
        assert_eq!(body["status"], "operational");
        assert_eq!(body["services"], serde_json::json!(["auth", "files"]));
    }

    #[tokio::test]
    async fn empty_registry_reports_no_services() {
        let (status, body) = get(router(Vec::new()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["services"], serde_json::json!({}));
    }

    #[test]
    fn inconsistent_registry_fails_construction() {
        let mut config = GatewayConfig::default();
        config.services.push(ServiceConfig::new("auth", "http://other:1"));
        assert!(matches!(
            HttpServer::new(config),
            Err(RegistryError::DuplicateName(name)) if name == "auth"
        ));
    }

    #[test]
    fn cors_accepts_wildcard_and_lists() {
        let _ = cors_layer(&CorsConfig::default());
        let _ = cors_layer(&CorsConfig {
            enabled: true,
            allow_origins: vec!["https://app.example".into(), "bad\norigin".into()],
        });
    }
}
