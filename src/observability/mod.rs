//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and health aggregator produce:
//!     → logging.rs (structured log events, request id on every dispatch line)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
