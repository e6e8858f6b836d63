//! Evid Flow API gateway library.

pub mod admin;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use health::{HealthAggregator, HealthReport};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::ServiceRegistry;
