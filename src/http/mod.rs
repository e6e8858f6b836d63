//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, operator endpoints, dispatch fallback)
//!     → request.rs (request id for log correlation)
//!     → [routing layer picks the service]
//!     → forward.rs (rewrite URI, strip hop-by-hop headers, deadline)
//!     → response.rs (relay backend response or map the failure)
//!     → Send to client
//! ```

pub mod forward;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use forward::Forwarder;
pub use request::{RequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
