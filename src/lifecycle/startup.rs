//! Startup orchestration.
//!
//! # Order
//! 1. Build the service registry (fatal on inconsistency)
//! 2. Start the metrics exporter when enabled
//! 3. Bind the listener (plaintext or TLS) and serve until a stop signal
//!
//! Any startup error is fatal: the gateway never serves with a partial registry.

use std::net::SocketAddr;
use std::path::Path;

use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::routing::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid service registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("invalid {field} {value:?}: {source}")]
    Address {
        field: &'static str,
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

fn parse_addr(field: &'static str, value: &str) -> Result<SocketAddr, StartupError> {
    value.parse().map_err(|source| StartupError::Address {
        field,
        value: value.to_string(),
        source,
    })
}

/// Bring the gateway up and serve until SIGINT/SIGTERM.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    let bind_addr = parse_addr("listener.bind_address", &config.listener.bind_address)?;
    let tls = config.listener.tls.clone();

    if config.observability.metrics_enabled {
        let addr = parse_addr("observability.metrics_address", &config.observability.metrics_address)?;
        metrics::init_metrics(addr);
    }

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::trigger_on_signal(shutdown);

    match tls {
        Some(tls) => {
            let tls_config = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path))
                .await
                .map_err(StartupError::Tls)?;
            server.run_tls(bind_addr, tls_config, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(bind_addr).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, server_shutdown).await?;
        }
    }

    Ok(())
}
