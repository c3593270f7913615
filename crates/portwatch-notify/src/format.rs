//! Message bodies for discovery and startup notifications.

use chrono::Utc;

use portwatch_core::{BannerEvent, KnownService};

/// Subject line for a discovery notification.
pub fn discovery_subject(event: &BannerEvent) -> String {
    format!(
        "portwatch: new service {}://{}:{}",
        event.transport, event.ip, event.port
    )
}

/// HTML body describing a single discovered service: identity fields,
/// banner title, and the raw option data from the feed.
pub fn discovery_body(event: &BannerEvent) -> String {
    let observed = event
        .timestamp
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    let opts = serde_json::to_string_pretty(&event.opts).unwrap_or_else(|_| "{}".to_string());

    format!(
        "<b>IP:</b> {} <br>\n\
         <b>Port:</b> {} <br>\n\
         <b>Transport:</b> {} <br>\n\
         <b>Title:</b> {} <br>\n\
         <b>Observed:</b> {} <br>\n\
         <b>Opts:</b> <br>\n\
         <pre>{}</pre>",
        event.ip,
        event.port,
        event.transport,
        event.title.as_deref().unwrap_or("(none)"),
        observed,
        opts,
    )
}

/// HTML body summarizing monitor startup: mode, known-service count,
/// and one line per known identity.
pub fn startup_body(known: &[KnownService], learning: bool) -> String {
    let mode = if learning { "learning" } else { "alerting" };
    let mut body = format!(
        "<b>portwatch started</b> in {} mode with {} known services.<br>\n<ul>\n",
        mode,
        known.len()
    );
    for svc in known {
        body.push_str(&format!("<li>{} ({})</li>\n", svc.identity, svc.name));
    }
    body.push_str("</ul>");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use portwatch_core::ServiceIdentity;

    fn event() -> BannerEvent {
        BannerEvent {
            ip: "10.0.0.1".to_string(),
            port: 443,
            transport: "tcp".to_string(),
            title: Some("nginx".to_string()),
            timestamp: Some("2024-05-01T12:00:00.000000".to_string()),
            opts: serde_json::json!({"vulns": ["CVE-2024-1234"]}),
        }
    }

    #[test]
    fn discovery_subject_names_the_service() {
        assert_eq!(
            discovery_subject(&event()),
            "portwatch: new service tcp://10.0.0.1:443"
        );
    }

    #[test]
    fn discovery_body_carries_identity_title_and_opts() {
        let body = discovery_body(&event());
        assert!(body.contains("10.0.0.1"));
        assert!(body.contains("443"));
        assert!(body.contains("tcp"));
        assert!(body.contains("nginx"));
        assert!(body.contains("2024-05-01T12:00:00.000000"));
        assert!(body.contains("CVE-2024-1234"));
    }

    #[test]
    fn discovery_body_tolerates_missing_title() {
        let mut ev = event();
        ev.title = None;
        assert!(discovery_body(&ev).contains("(none)"));
    }

    #[test]
    fn startup_body_enumerates_known_services() {
        let known = vec![
            KnownService {
                name: "edge-lb".to_string(),
                identity: ServiceIdentity {
                    ip: "10.0.0.1".to_string(),
                    port: 443,
                    transport: "tcp".to_string(),
                },
            },
            KnownService::discovered(ServiceIdentity {
                ip: "10.0.0.2".to_string(),
                port: 22,
                transport: "tcp".to_string(),
            }),
        ];

        let body = startup_body(&known, true);
        assert!(body.contains("learning"));
        assert!(body.contains("2 known services"));
        assert!(body.contains("tcp://10.0.0.1:443 (edge-lb)"));
        assert!(body.contains("tcp://10.0.0.2:22 (unknown)"));
    }

    #[test]
    fn startup_body_without_learning_says_alerting() {
        assert!(startup_body(&[], false).contains("alerting"));
    }
}
