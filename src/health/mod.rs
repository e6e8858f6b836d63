//! Health aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → aggregator.rs (fan out one probe per registered service)
//!     → each probe: GET <base><probe path>, own deadline
//!     → join barrier: wait for every probe to settle
//!     → report.rs (HealthReport, registry order)
//! ```
//!
//! # Design Decisions
//! - Probes run on demand; nothing is cached between calls
//! - Health is observational only and never affects routing
//! - An unreachable backend is a report value, not an error

pub mod aggregator;
pub mod report;

pub use aggregator::HealthAggregator;
pub use report::{HealthReport, ProbeStatus, ServiceHealth};
