//! Health report types.

use std::time::Duration;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Outcome of a single liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Probe answered with a 2xx status.
    Healthy,
    /// Probe answered with any other status.
    Unhealthy,
    /// Connection failed or the probe deadline expired.
    Unreachable,
}

/// Probe result for one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    pub status: ProbeStatus,
    #[serde(rename = "latency_ms", serialize_with = "serialize_millis")]
    pub latency: Duration,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

fn serialize_millis<S: Serializer>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = (latency.as_secs_f64() * 1_000_000.0).round() / 1_000.0;
    serializer.serialize_f64(millis)
}

impl ServiceHealth {
    pub fn from_status(code: u16, latency: Duration) -> Self {
        let status = if (200..300).contains(&code) {
            ProbeStatus::Healthy
        } else {
            ProbeStatus::Unhealthy
        };
        Self {
            status,
            latency,
            detail: format!("HTTP {}", code),
            status_code: Some(code),
        }
    }

    pub fn unreachable(latency: Duration, detail: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Unreachable,
            latency,
            detail: detail.into(),
            status_code: None,
        }
    }
}

/// Point-in-time liveness of every registered service, in registry order.
///
/// Serializes as a JSON object keyed by service name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthReport {
    services: Vec<(String, ServiceHealth)>,
}

impl HealthReport {
    pub fn new(services: Vec<(String, ServiceHealth)>) -> Self {
        Self { services }
    }

    pub fn get(&self, name: &str) -> Option<&ServiceHealth> {
        self.services
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, health)| health)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceHealth)> {
        self.services.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn count(&self, status: ProbeStatus) -> usize {
        self.services.iter().filter(|(_, h)| h.status == status).count()
    }
}

impl Serialize for HealthReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.services.len()))?;
        for (name, health) in &self.services {
            map.serialize_entry(name, health)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_code_classification() {
        let ms = Duration::from_millis(3);
        assert_eq!(ServiceHealth::from_status(200, ms).status, ProbeStatus::Healthy);
        assert_eq!(ServiceHealth::from_status(204, ms).status, ProbeStatus::Healthy);
        assert_eq!(ServiceHealth::from_status(404, ms).status, ProbeStatus::Unhealthy);
        assert_eq!(ServiceHealth::from_status(503, ms).status, ProbeStatus::Unhealthy);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let report = HealthReport::new(vec![
            ("meal".into(), ServiceHealth::from_status(200, Duration::from_micros(12_345))),
            (
                "auth".into(),
                ServiceHealth::unreachable(Duration::from_secs(5), "timed out after 5s"),
            ),
        ]);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "meal": { "status": "healthy", "latency_ms": 12.345, "detail": "HTTP 200", "status_code": 200 },
                "auth": { "status": "unreachable", "latency_ms": 5000.0, "detail": "timed out after 5s" },
            })
        );

        let text = serde_json::to_string(&report).unwrap();
        assert!(text.find("\"meal\"").unwrap() < text.find("\"auth\"").unwrap());
    }

    #[test]
    fn counts_by_status() {
        let report = HealthReport::new(vec![
            ("a".into(), ServiceHealth::from_status(200, Duration::ZERO)),
            ("b".into(), ServiceHealth::from_status(500, Duration::ZERO)),
            ("c".into(), ServiceHealth::unreachable(Duration::ZERO, "refused")),
        ]);
        assert_eq!(report.count(ProbeStatus::Healthy), 1);
        assert_eq!(report.count(ProbeStatus::Unhealthy), 1);
        assert_eq!(report.get("c").unwrap().detail, "refused");
        assert!(report.get("d").is_none());
    }
}
