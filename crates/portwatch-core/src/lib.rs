//! portwatch-core: Shared types, configuration, and error handling for
//! the portwatch monitor.
//!
//! This crate provides the foundation used across all portwatch
//! components:
//! - Domain types (service identities, known services, banner events)
//! - The persisted configuration blob and its on-disk store
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigStore, MonitorConfig, NotificationConfig};
pub use error::CoreError;
pub use types::{AlertFilters, BannerEvent, KnownService, RegisteredAlert, ServiceIdentity, WatchRange};
