//! Route matching logic.
//!
//! # Responsibilities
//! - Extract the service segment from a request path
//! - Skip the optional API prefix segment (`/api/<service>/...`)
//! - Compute the residual path forwarded to the backend
//!
//! # Design Decisions
//! - Exact equality on the service segment: `/authx` never matches `auth`
//! - Path matching is case-sensitive
//! - Pure function of (path, registry); no allocation until a match is found

use crate::routing::registry::{ServiceEntry, ServiceRegistry};

/// The outcome of matching a request path against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub service: &'a ServiceEntry,
    /// Path with the matched prefix removed; never empty.
    pub residual_path: String,
}

impl RouteMatch<'_> {
    /// Absolute upstream address for this match, carrying the original query.
    pub fn target(&self, query: Option<&str>) -> String {
        match query {
            Some(q) => format!("{}{}?{}", self.service.base_address(), self.residual_path, q),
            None => format!("{}{}", self.service.base_address(), self.residual_path),
        }
    }
}

/// Match `path` to a registered service.
///
/// The first segment is looked up directly. If it is not a service but equals
/// `api_prefix`, the second segment is looked up instead. An empty residual
/// becomes `/`.
pub fn match_route<'a>(
    path: &str,
    registry: &'a ServiceRegistry,
    api_prefix: &str,
) -> Option<RouteMatch<'a>> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    let (first, after_first) = split_segment(rest);

    if let Some(service) = registry.lookup(first) {
        return Some(RouteMatch::new(service, after_first));
    }

    if api_prefix.is_empty() || first != api_prefix {
        return None;
    }

    let (second, after_second) = split_segment(after_first.strip_prefix('/')?);
    let service = registry.lookup(second)?;
    Some(RouteMatch::new(service, after_second))
}

impl<'a> RouteMatch<'a> {
    fn new(service: &'a ServiceEntry, residual: &str) -> Self {
        let residual_path = if residual.is_empty() {
            "/".to_string()
        } else {
            residual.to_string()
        };
        Self {
            service,
            residual_path,
        }
    }
}

/// Split `s` at its first `/`, keeping the slash on the remainder.
fn split_segment(s: &str) -> (&str, &str) {
    match s.find('/') {
        Some(i) => s.split_at(i),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    fn registry() -> ServiceRegistry {
        ServiceRegistry::new(&[
            ServiceConfig::new("auth", "http://A"),
            ServiceConfig::new("files", "http://B"),
        ])
        .unwrap()
    }

    fn resolve(path: &str) -> Option<(String, String)> {
        let reg = registry();
        match_route(path, &reg, "api")
            .map(|m| (m.service.name().to_string(), m.residual_path.clone()))
    }

    #[test]
    fn strips_service_segment() {
        assert_eq!(resolve("/auth/login"), Some(("auth".into(), "/login".into())));
        assert_eq!(resolve("/auth/users/42/roles"), Some(("auth".into(), "/users/42/roles".into())));
    }

    #[test]
    fn empty_residual_becomes_root() {
        assert_eq!(resolve("/files"), Some(("files".into(), "/".into())));
        assert_eq!(resolve("/files/"), Some(("files".into(), "/".into())));
        assert_eq!(resolve("/api/files"), Some(("files".into(), "/".into())));
    }

    #[test]
    fn skips_api_prefix() {
        assert_eq!(resolve("/api/auth/login"), Some(("auth".into(), "/login".into())));
    }

    #[test]
    fn segment_must_match_exactly() {
        assert_eq!(resolve("/authx/login"), None);
        assert_eq!(resolve("/au"), None);
        assert_eq!(resolve("/Auth/login"), None);
        assert_eq!(resolve("/api/authx"), None);
    }

    #[test]
    fn unknown_paths_do_not_match() {
        assert_eq!(resolve("/unknown"), None);
        assert_eq!(resolve("/"), None);
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("/api"), None);
        assert_eq!(resolve("/api/"), None);
        assert_eq!(resolve("/health"), None);
    }

    #[test]
    fn prefix_can_be_disabled() {
        let reg = registry();
        assert!(match_route("/api/auth/login", &reg, "").is_none());
        assert!(match_route("/auth/login", &reg, "").is_some());
    }

    #[test]
    fn registered_service_wins_over_prefix() {
        let reg = ServiceRegistry::new(&[
            ServiceConfig::new("api", "http://legacy"),
            ServiceConfig::new("auth", "http://A"),
        ])
        .unwrap();

        let m = match_route("/api/auth/login", &reg, "api").unwrap();
        assert_eq!(m.service.name(), "api");
        assert_eq!(m.residual_path, "/auth/login");
    }

    #[test]
    fn target_keeps_query() {
        let reg = registry();
        let m = match_route("/auth/login", &reg, "api").unwrap();
        assert_eq!(m.target(None), "http://A/login");
        assert_eq!(m.target(Some("next=%2Fhome&x=1")), "http://A/login?next=%2Fhome&x=1");

        let m = match_route("/files", &reg, "api").unwrap();
        assert_eq!(m.target(None), "http://B/");
    }
}
