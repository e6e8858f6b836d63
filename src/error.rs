//! Dispatch error taxonomy.
//!
//! Every failure on the request path resolves to one of these variants.
//! Health probe failures are not errors: they surface as
//! [`ProbeStatus::Unreachable`](crate::health::ProbeStatus) in the report.

use std::fmt;

use axum::http::StatusCode;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a backend could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Connection refused, DNS failure, network unreachable, connect timeout.
    Connect,
    /// Forwarding deadline elapsed.
    Timeout,
}

impl UnavailableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailableReason::Connect => "connect",
            UnavailableReason::Timeout => "timeout",
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("no service matches path {path}")]
    RouteNotFound { path: String },

    #[error("service {service} unavailable at {target} ({reason})")]
    BackendUnavailable {
        service: String,
        target: String,
        reason: UnavailableReason,
    },

    #[error("forwarding to {service} at {target} failed: {}", error_chain(.source.as_ref()))]
    ForwardingFailure {
        service: String,
        target: String,
        source: BoxError,
    },
}

impl GatewayError {
    pub fn unavailable(service: &str, target: &str, reason: UnavailableReason) -> Self {
        GatewayError::BackendUnavailable {
            service: service.to_string(),
            target: target.to_string(),
            reason,
        }
    }

    pub fn forwarding(service: &str, target: &str, source: impl Into<BoxError>) -> Self {
        GatewayError::ForwardingFailure {
            service: service.to_string(),
            target: target.to_string(),
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::BackendUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::ForwardingFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller. Never includes upstream error text.
    pub fn client_detail(&self) -> String {
        match self {
            GatewayError::RouteNotFound { .. } => "Not Found".to_string(),
            GatewayError::BackendUnavailable { service, .. } => {
                format!("Service {} temporarily unavailable", service)
            }
            GatewayError::ForwardingFailure { .. } => "Internal server error".to_string(),
        }
    }

    /// Emit the server-side log line for this failure.
    pub fn log(&self, request_id: &str) {
        match self {
            GatewayError::RouteNotFound { path } => {
                tracing::debug!(request_id = %request_id, path = %path, "No service matched");
            }
            GatewayError::BackendUnavailable { service, target, reason } => {
                tracing::error!(
                    request_id = %request_id,
                    service = %service,
                    target = %target,
                    reason = reason.as_str(),
                    "Backend unavailable"
                );
            }
            GatewayError::ForwardingFailure { service, target, source } => {
                tracing::error!(
                    request_id = %request_id,
                    service = %service,
                    target = %target,
                    error = %error_chain(source.as_ref()),
                    "Forwarding failed"
                );
            }
        }
    }
}

/// Render an error with all of its sources, outermost first.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}
