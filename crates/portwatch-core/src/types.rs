//! Core domain types for the portwatch monitor.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Service identity ──────────────────────────────────────────────

/// Composite key identifying one observed network service.
///
/// Equality is exact field-wise match: no case folding, no CIDR
/// containment. Two banners carrying the same ip/port/transport are
/// the same service regardless of banner content, title, or timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ServiceIdentity {
    pub ip: String,
    pub port: u16,
    pub transport: String,
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.transport, self.ip, self.port)
    }
}

/// A recognized service in the registry.
///
/// `name` is an operator-assigned label. It is never part of the
/// identity and never consulted during matching. Serializes flat, so a
/// config entry reads `{"name": ..., "ip": ..., "port": ..., "transport": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnownService {
    pub name: String,
    #[serde(flatten)]
    pub identity: ServiceIdentity,
}

impl KnownService {
    /// Label assigned to services recorded by auto-discovery.
    pub const DEFAULT_NAME: &'static str = "unknown";

    /// A freshly auto-discovered service, not yet named by an operator.
    pub fn discovered(identity: ServiceIdentity) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            identity,
        }
    }
}

// ── Watch ranges and alerts ───────────────────────────────────────

/// A configured network range the monitor asks the feed to track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRange {
    /// Alert name, unique per account.
    pub name: String,
    /// Network filter expression, usually a CIDR block.
    pub filter: String,
}

/// An alert subscription as reported by the remote feed.
///
/// Consulted only for the name-existence check during reconciliation;
/// never persisted locally.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredAlert {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub filters: AlertFilters,
}

/// Filter block attached to an alert subscription.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertFilters {
    #[serde(default)]
    pub ip: Vec<String>,
}

// ── Banner events ─────────────────────────────────────────────────

/// A single service observation delivered by the banner firehose.
///
/// Ephemeral: projected into a [`ServiceIdentity`] during
/// classification, forwarded into the notification body, and
/// discarded. Never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerEvent {
    #[serde(rename = "ip_str")]
    pub ip: String,
    pub port: u16,
    pub transport: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Raw per-banner metadata, forwarded verbatim into notifications.
    #[serde(default)]
    pub opts: serde_json::Value,
}

impl BannerEvent {
    /// Project this event into its identity, verbatim.
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity {
            ip: self.ip.clone(),
            port: self.port,
            transport: self.transport.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(ip: &str, port: u16, transport: &str) -> ServiceIdentity {
        ServiceIdentity {
            ip: ip.to_string(),
            port,
            transport: transport.to_string(),
        }
    }

    #[test]
    fn identity_equality_is_exact_fieldwise() {
        let a = identity("10.0.0.1", 443, "tcp");
        assert_eq!(a, identity("10.0.0.1", 443, "tcp"));
        assert_ne!(a, identity("10.0.0.2", 443, "tcp"));
        assert_ne!(a, identity("10.0.0.1", 444, "tcp"));
        assert_ne!(a, identity("10.0.0.1", 443, "udp"));
        // No normalization: transport comparison is case-sensitive.
        assert_ne!(a, identity("10.0.0.1", 443, "TCP"));
    }

    #[test]
    fn name_is_not_part_of_identity() {
        let a = KnownService {
            name: "edge-lb".to_string(),
            identity: identity("10.0.0.1", 443, "tcp"),
        };
        let b = KnownService::discovered(identity("10.0.0.1", 443, "tcp"));
        assert_eq!(b.name, "unknown");
        assert_eq!(a.identity, b.identity);
    }

    #[test]
    fn known_service_serializes_flat() {
        let svc = KnownService::discovered(identity("1.2.3.4", 22, "tcp"));
        let json = serde_json::to_value(&svc).unwrap();
        assert_eq!(json["name"], "unknown");
        assert_eq!(json["ip"], "1.2.3.4");
        assert_eq!(json["port"], 22);
        assert_eq!(json["transport"], "tcp");

        let back: KnownService = serde_json::from_value(json).unwrap();
        assert_eq!(back, svc);
    }

    #[test]
    fn banner_event_decodes_with_missing_optionals() {
        let raw = r#"{"ip_str":"10.0.0.1","port":443,"transport":"tcp"}"#;
        let event: BannerEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.identity(), identity("10.0.0.1", 443, "tcp"));
        assert!(event.title.is_none());
        assert!(event.opts.is_null());
    }

    #[test]
    fn banner_event_carries_title_and_opts() {
        let raw = r#"{"ip_str":"10.0.0.1","port":443,"transport":"tcp","title":"nginx","timestamp":"2024-05-01T12:00:00.000000","opts":{"vulns":[]}}"#;
        let event: BannerEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.title.as_deref(), Some("nginx"));
        assert!(event.opts.is_object());
    }

    #[test]
    fn identity_display() {
        assert_eq!(identity("10.0.0.1", 8080, "tcp").to_string(), "tcp://10.0.0.1:8080");
    }

    #[test]
    fn registered_alert_decodes_without_filters() {
        let raw = r#"{"id":"X9Y2LQPM","name":"dmz"}"#;
        let alert: RegisteredAlert = serde_json::from_str(raw).unwrap();
        assert_eq!(alert.name, "dmz");
        assert!(alert.filters.ip.is_empty());
    }
}
