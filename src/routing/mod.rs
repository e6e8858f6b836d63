//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → matcher.rs (extract service segment, skip API prefix)
//!     → registry.rs (exact name lookup)
//!     → Return: RouteMatch { service, residual_path } or no match
//!
//! Registry construction (at startup):
//!     ServiceConfig[]
//!     → validate names and addresses
//!     → Freeze as immutable ServiceRegistry
//! ```
//!
//! # Design Decisions
//! - Registry built at startup, immutable at runtime
//! - Exact first-segment matching, no prefix search or regex
//! - Deterministic: same path always matches the same service

pub mod matcher;
pub mod registry;

pub use matcher::{match_route, RouteMatch};
pub use registry::{RegistryError, ServiceEntry, ServiceRegistry};
