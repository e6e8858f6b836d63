//! Static service registry.
//!
//! # Responsibilities
//! - Hold the name → base address mapping for every backend service
//! - Resolve a service name to its entry
//! - Iterate entries in configuration order (health probing)
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap, ordered Vec for iteration
//! - Any malformed entry rejects the whole registry

use std::collections::HashMap;

use url::Url;

use crate::config::ServiceConfig;

/// Error raised when a registry entry is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("service name must not be empty")]
    EmptyName,

    #[error("invalid service name {0:?}: must be a single path segment")]
    InvalidName(String),

    #[error("duplicate service name: {0}")]
    DuplicateName(String),

    #[error("service {0} has an empty address")]
    EmptyAddress(String),

    #[error("service {name} has an invalid address {address:?}: {reason}")]
    InvalidAddress {
        name: String,
        address: String,
        reason: String,
    },

    #[error("service {name} uses unsupported scheme {scheme:?} (expected http)")]
    UnsupportedScheme { name: String, scheme: String },
}

/// A single backend service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    name: String,
    base_address: String,
}

impl ServiceEntry {
    /// Validate a name/address pair.
    ///
    /// The stored base address has trailing slashes removed so a residual
    /// path can be appended directly.
    pub fn parse(name: &str, address: &str) -> Result<Self, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if name.contains('/') || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }

        let address = address.trim();
        if address.is_empty() {
            return Err(RegistryError::EmptyAddress(name.to_string()));
        }

        let invalid = |reason: &str| RegistryError::InvalidAddress {
            name: name.to_string(),
            address: address.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(address).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "http" {
            return Err(RegistryError::UnsupportedScheme {
                name: name.to_string(),
                scheme: url.scheme().to_string(),
            });
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }

        Ok(Self {
            name: name.to_string(),
            base_address: address.trim_end_matches('/').to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }
}

/// Immutable, ordered collection of backend services keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    entries: Vec<ServiceEntry>,
    index: HashMap<String, usize>,
}

impl ServiceRegistry {
    /// Build the registry, failing on the first malformed or duplicate entry.
    pub fn new(configs: &[ServiceConfig]) -> Result<Self, RegistryError> {
        let mut entries = Vec::with_capacity(configs.len());
        let mut index = HashMap::with_capacity(configs.len());

        for config in configs {
            let entry = ServiceEntry::parse(&config.name, &config.address)?;
            if index.insert(entry.name.clone(), entries.len()).is_some() {
                return Err(RegistryError::DuplicateName(entry.name));
            }
            entries.push(entry);
        }

        Ok(Self { entries, index })
    }

    /// Resolve a service by exact name.
    pub fn lookup(&self, name: &str) -> Option<&ServiceEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// All entries in configuration order.
    pub fn all(&self) -> &[ServiceEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(ServiceEntry::name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(pairs: &[(&str, &str)]) -> Result<ServiceRegistry, RegistryError> {
        let configs: Vec<_> = pairs
            .iter()
            .map(|(n, a)| ServiceConfig::new(*n, *a))
            .collect();
        ServiceRegistry::new(&configs)
    }

    #[test]
    fn lookup_is_exact() {
        let reg = registry(&[("auth", "http://a:8001"), ("files", "http://b:8008/")]).unwrap();

        assert_eq!(reg.lookup("auth").unwrap().base_address(), "http://a:8001");
        assert_eq!(reg.lookup("files").unwrap().base_address(), "http://b:8008");
        assert!(reg.lookup("aut").is_none());
        assert!(reg.lookup("authx").is_none());
        assert!(reg.lookup("").is_none());
    }

    #[test]
    fn iteration_order_is_stable() {
        let reg = registry(&[("meal", "http://m:1"), ("ai", "http://x:2"), ("auth", "http://a:3")])
            .unwrap();

        assert_eq!(reg.names(), ["meal", "ai", "auth"]);
        assert_eq!(reg.names(), ["meal", "ai", "auth"]);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn rejects_duplicates() {
        let err = registry(&[("auth", "http://a:1"), ("auth", "http://b:2")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("auth".into()));
    }

    #[test]
    fn rejects_malformed_entries() {
        assert_eq!(registry(&[("", "http://a:1")]).unwrap_err(), RegistryError::EmptyName);
        assert_eq!(
            registry(&[("a/b", "http://a:1")]).unwrap_err(),
            RegistryError::InvalidName("a/b".into())
        );
        assert_eq!(
            registry(&[("auth", "  ")]).unwrap_err(),
            RegistryError::EmptyAddress("auth".into())
        );
        assert!(matches!(
            registry(&[("auth", "auth-service:8001")]).unwrap_err(),
            RegistryError::UnsupportedScheme { .. } | RegistryError::InvalidAddress { .. }
        ));
        assert!(matches!(
            registry(&[("auth", "https://a:443")]).unwrap_err(),
            RegistryError::UnsupportedScheme { .. }
        ));
        assert!(matches!(
            registry(&[("auth", "http://a:1/?x=1")]).unwrap_err(),
            RegistryError::InvalidAddress { .. }
        ));
    }
}
