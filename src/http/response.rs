//! Response handling.
//!
//! # Responsibilities
//! - Relay a backend response to the client unchanged
//! - Map dispatch errors to client-facing status codes
//!
//! # Design Decisions
//! - Backend payloads are opaque bytes; content type is never inspected
//! - Error bodies are `{"detail": ...}` and never carry upstream error text

use axum::{
    body::{Body, Bytes},
    http::response::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::GatewayError;
use crate::http::headers::strip_hop_by_hop;

/// Rebuild a client response from a fully read backend response.
///
/// Only hop-by-hop headers are dropped. The serving connection may still add
/// its own `Date` when the backend sent none, and sets framing headers
/// (`content-length`) for the buffered body.
pub fn relay(mut parts: Parts, body: Bytes) -> Response {
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::from(body))
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.client_detail() }))).into_response()
    }
}
