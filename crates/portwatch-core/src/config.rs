//! The persisted monitor configuration blob.
//!
//! A single JSON file holds the feed API key, the watch-range map,
//! notification settings, and the known-service list. It is read once
//! at startup and rewritten wholesale whenever learning mode records a
//! new known service. There is no schema versioning; a missing or
//! malformed file is a fatal startup error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{KnownService, WatchRange};

/// Top-level persisted configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// API key for the intelligence feed.
    pub api_key: String,

    /// Watch ranges: alert name → network filter (usually a CIDR).
    #[serde(default)]
    pub watch_ranges: BTreeMap<String, String>,

    pub notification: NotificationConfig,

    /// Services already recognized. Not deduplicated on load; a
    /// hand-edited file with duplicates just matches redundantly.
    #[serde(default)]
    pub known: Vec<KnownService>,
}

/// Outbound mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// SMTP relay host.
    pub server: String,
    pub from: String,
    pub to: Vec<String>,
}

impl MonitorConfig {
    /// Watch ranges as name/filter pairs, in stable name order.
    pub fn ranges(&self) -> Vec<WatchRange> {
        self.watch_ranges
            .iter()
            .map(|(name, filter)| WatchRange {
                name: name.clone(),
                filter: filter.clone(),
            })
            .collect()
    }
}

/// Handle to the configuration file on disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the config file.
    pub fn load(&self) -> Result<MonitorConfig> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Rewrite the entire config file.
    ///
    /// One whole-file write, not an append. A crash mid-write can lose
    /// the file; no crash-safety guarantee is made.
    pub fn save(&self, config: &MonitorConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "Config written");
        Ok(())
    }
}
