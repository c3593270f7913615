//! Runtime settings outside the persisted config blob.
//!
//! Loaded from an optional `portwatch.toml` `[monitor]` section or
//! `PORTWATCH__` environment variables. These knobs tune the process;
//! the watch list and known-service state live in the config blob.

use serde::Deserialize;

use crate::error::Result;

/// Tunables for the monitor process.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Base URL for the feed's REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL for the streaming firehose.
    #[serde(default = "default_stream_base")]
    pub stream_base: String,

    /// Seconds to wait after stream closure before reopening.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

fn default_api_base() -> String {
    "https://api.shodan.io".to_string()
}

fn default_stream_base() -> String {
    "https://stream.shodan.io".to_string()
}

fn default_cooldown_secs() -> u64 {
    600
}

fn default_smtp_port() -> u16 {
    25
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            stream_base: default_stream_base(),
            cooldown_secs: default_cooldown_secs(),
            smtp_port: default_smtp_port(),
        }
    }
}

/// Load settings from `{file_prefix}.toml` (optional) and
/// `PORTWATCH__`-prefixed environment variables.
pub fn load(file_prefix: &str) -> Result<MonitorSettings> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("PORTWATCH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<MonitorSettings>("monitor") {
        Ok(s) => Ok(s),
        Err(_) => Ok(MonitorSettings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.api_base, "https://api.shodan.io");
        assert_eq!(settings.stream_base, "https://stream.shodan.io");
        assert_eq!(settings.cooldown_secs, 600);
        assert_eq!(settings.smtp_port, 25);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load("portwatch-test-does-not-exist").unwrap();
        assert_eq!(settings, MonitorSettings::default());
    }

    #[test]
    fn partial_section_keeps_remaining_defaults() {
        let raw = r#"{"cooldown_secs": 120}"#;
        let settings: MonitorSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.cooldown_secs, 120);
        assert_eq!(settings.smtp_port, 25);
    }
}
