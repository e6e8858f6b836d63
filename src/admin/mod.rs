//! Operator-facing endpoints.
//!
//! - `GET /`: gateway status and the registered service names
//! - `GET /health`: aggregated liveness of every backend
//!
//! These are the only paths the dispatcher does not own.

pub mod handlers;

use axum::{routing::get, Router};

use crate::http::server::AppState;
use self::handlers::*;

pub fn operator_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_status))
        .route("/health", get(get_health))
}
