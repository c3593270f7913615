//! Discovery classification: known service or new discovery.

use portwatch_core::{BannerEvent, KnownService};
use portwatch_notify::Notifier;

use crate::registry::ServiceRegistry;

/// Classify one banner event against the registry. Returns true when
/// the event announced a previously unseen service.
///
/// An unknown identity is recorded first and notified second: if the
/// dispatch fails the service stays registered, so a flaky mail server
/// costs at most the one missed alert rather than a repeat per
/// re-observation.
pub async fn process_banner<N: Notifier>(
    event: &BannerEvent,
    registry: &mut ServiceRegistry,
    notifier: &N,
) -> bool {
    let identity = event.identity();
    if registry.is_known(&identity) {
        return false;
    }

    tracing::info!(
        service = %identity,
        title = event.title.as_deref().unwrap_or(""),
        "Unknown service discovered"
    );
    registry.add(KnownService::discovered(identity));

    if let Err(e) = notifier.notify_discovery(event).await {
        tracing::warn!(error = %e, "Failed to send discovery notification");
    }
    true
}
