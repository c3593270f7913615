//! Error types for the portwatch-monitor crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Feed error: {0}")]
    Intel(#[from] portwatch_intel::IntelError),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
