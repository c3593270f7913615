//! The supervisory monitor loop.
//!
//! Opens the firehose, drains it through the classifier, sleeps a
//! fixed cooldown on closure, and reopens. Runs until the process is
//! killed; there is no terminal state in normal operation.

use std::time::Duration;

use portwatch_intel::{EventStream, IntelFeed};
use portwatch_notify::Notifier;

use crate::classify;
use crate::error::Result;
use crate::registry::ServiceRegistry;

/// Counters for one stream segment.
#[derive(Debug, Default)]
pub struct SegmentSummary {
    pub events: u64,
    pub discovered: u64,
}

/// Long-lived monitor state: feed client, registry, notifier.
pub struct Monitor<C, N> {
    intel: C,
    notifier: N,
    registry: ServiceRegistry,
    cooldown: Duration,
}

impl<C: IntelFeed, N: Notifier> Monitor<C, N> {
    pub fn new(intel: C, notifier: N, registry: ServiceRegistry, cooldown: Duration) -> Self {
        Self {
            intel,
            notifier,
            registry,
            cooldown,
        }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Drive the monitor until the process dies.
    ///
    /// A failed stream open is fatal: with no event source there is
    /// nothing to monitor. Stream closure is a normal end-of-segment
    /// condition and only triggers the cooldown.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let summary = self.consume_segment().await?;
            tracing::info!(
                events = summary.events,
                discovered = summary.discovered,
                cooldown_secs = self.cooldown.as_secs(),
                "Stream closed; cooling down before reconnect"
            );
            tokio::time::sleep(self.cooldown).await;
        }
    }

    /// Open the firehose and classify events until it closes. A
    /// mid-stream transport or decode fault ends the segment the same
    /// way a remote close does.
    async fn consume_segment(&mut self) -> Result<SegmentSummary> {
        let mut stream = self.intel.open_event_stream().await?;
        let mut summary = SegmentSummary::default();

        while let Some(next) = stream.next_event().await {
            match next {
                Ok(event) => {
                    summary.events += 1;
                    if classify::process_banner(&event, &mut self.registry, &self.notifier).await {
                        summary.discovered += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stream terminated early");
                    break;
                }
            }
        }

        Ok(summary)
    }
}
