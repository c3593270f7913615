//! Error types for the portwatch-intel crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntelError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode feed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IntelError>;
