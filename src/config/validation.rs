//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Registry integrity: unique names, well-formed base addresses
//! - Validate value ranges (timeouts > 0, probe deadline below forwarding deadline)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use crate::config::schema::GatewayConfig;
use crate::routing::registry::{RegistryError, ServiceEntry};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("health_check.timeout_secs ({probe}s) must be shorter than timeouts.request_secs ({request}s)")]
    ProbeDeadlineTooLong { probe: u64, request: u64 },

    #[error("health_check.path must start with '/': {0:?}")]
    ProbePath(String),

    #[error("routing.api_prefix must be a single path segment: {0:?}")]
    ApiPrefix(String),
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = Vec::new();

    let mut seen = HashSet::new();
    for service in &config.services {
        if let Err(e) = ServiceEntry::parse(&service.name, &service.address) {
            errors.push(e.into());
        }
        if !service.name.is_empty() && !seen.insert(service.name.as_str()) {
            errors.push(RegistryError::DuplicateName(service.name.clone()).into());
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.connect_secs" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.request_secs" });
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "health_check.timeout_secs" });
    } else if config.health_check.timeout_secs >= config.timeouts.request_secs {
        errors.push(ValidationError::ProbeDeadlineTooLong {
            probe: config.health_check.timeout_secs,
            request: config.timeouts.request_secs,
        });
    }

    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::ProbePath(config.health_check.path.clone()));
    }

    if config.routing.api_prefix.contains('/') {
        errors.push(ValidationError::ApiPrefix(config.routing.api_prefix.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
