//! Evid Flow API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  GATEWAY                      │
//!   Client Request     │  ┌────────┐   ┌──────────┐   ┌───────────┐   │
//!   ───────────────────┼─▶│  http  │──▶│ routing  │──▶│  forward  │───┼──▶ Backend
//!                      │  │ server │   │ matcher  │   │ (deadline)│   │    service
//!   Client Response    │  └────────┘   └────┬─────┘   └─────┬─────┘   │
//!   ◀──────────────────┼───── relay ◀───────┼───────────────┘         │
//!                      │                    ▼                          │
//!                      │              ┌──────────┐                     │
//!                      │              │ registry │ (immutable)         │
//!                      │              └────┬─────┘                     │
//!   GET /health        │  ┌────────┐       │                           │
//!   ───────────────────┼─▶│ health │◀──────┘  fan-out probes ──────────┼──▶ /health
//!                      │  │  agg.  │                                   │    on each
//!                      │  └────────┘                                   │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use evid_gateway::config::load_or_default;
use evid_gateway::lifecycle::startup;
use evid_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "evid-gateway", version, about = "API gateway for the Evid Flow services")]
struct Args {
    /// Path to the TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_or_default(args.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        services = config.services.len(),
        request_timeout_secs = config.timeouts.request_secs,
        probe_timeout_secs = config.health_check.timeout_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
