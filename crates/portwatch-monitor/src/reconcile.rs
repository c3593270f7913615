//! Startup alert reconciliation.
//!
//! Aligns the configured watch ranges with the alert subscriptions
//! registered on the remote feed. Matching is by name only: a remote
//! alert with the right name but a different filter still counts as
//! covered, so renaming a range is the only way to re-propagate a
//! changed filter.

use std::collections::HashSet;
use std::net::IpAddr;

use ipnet::IpNet;

use portwatch_core::WatchRange;
use portwatch_intel::IntelFeed;

use crate::error::Result;

/// Outcome of one reconciliation pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub covered: u32,
    pub created: u32,
    pub failed: u32,
}

/// Ensure every configured watch range has a remote alert.
///
/// Idempotent: ranges whose name is already registered are left
/// untouched, so a second pass against unchanged remote state creates
/// nothing. Fails only if the alert list itself cannot be fetched;
/// per-range creation failures are logged and skipped.
pub async fn reconcile_alerts<C: IntelFeed>(
    client: &C,
    ranges: &[WatchRange],
) -> Result<ReconcileSummary> {
    let registered: HashSet<String> = client
        .list_alerts()
        .await?
        .into_iter()
        .map(|alert| alert.name)
        .collect();

    let mut summary = ReconcileSummary::default();
    for range in ranges {
        if registered.contains(&range.name) {
            summary.covered += 1;
            continue;
        }

        if !is_network_expr(&range.filter) {
            tracing::warn!(
                alert = %range.name,
                filter = %range.filter,
                "Watch filter is not an IP network; the feed may reject it"
            );
        }

        tracing::info!(alert = %range.name, filter = %range.filter, "Registering watch range");
        match client
            .create_alert(&range.name, std::slice::from_ref(&range.filter), 0)
            .await
        {
            Ok(id) => {
                tracing::debug!(alert = %range.name, id = %id, "Alert created");
                summary.created += 1;
            }
            Err(e) => {
                tracing::warn!(alert = %range.name, error = %e, "Failed to register alert");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        covered = summary.covered,
        created = summary.created,
        failed = summary.failed,
        "Alert reconciliation complete"
    );
    Ok(summary)
}

/// True if the filter parses as a CIDR block or a bare IP address.
fn is_network_expr(filter: &str) -> bool {
    filter.parse::<IpNet>().is_ok() || filter.parse::<IpAddr>().is_ok()
}
