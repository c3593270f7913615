//! Account and alert status reporting.

use portwatch_intel::IntelFeed;

/// Log the account profile and the registered alert list. Both halves
/// are best-effort diagnostics; failures never block startup.
pub async fn report<C: IntelFeed>(client: &C) {
    match client.account_profile().await {
        Ok(profile) => tracing::info!(
            display_name = profile.display_name.as_deref().unwrap_or("-"),
            member = profile.member,
            credits = profile.credits,
            "Account profile"
        ),
        Err(e) => tracing::warn!(error = %e, "Failed to fetch account profile"),
    }

    match client.list_alerts().await {
        Ok(alerts) => {
            tracing::info!(count = alerts.len(), "Registered alerts");
            for alert in &alerts {
                tracing::info!(id = %alert.id, name = %alert.name, networks = ?alert.filters.ip, "Alert");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Failed to fetch alert list"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedIntel;

    #[tokio::test]
    async fn report_survives_a_failing_feed() {
        let intel = ScriptedIntel {
            fail_list: true,
            ..ScriptedIntel::default()
        };
        // Purely observational; must not panic or error.
        report(&intel).await;
    }
}
