//! portwatch-notify: outbound notifications for discovered services.
//!
//! Formats discovery and startup messages as HTML mail and delivers
//! them over SMTP. The [`Notifier`] trait is the seam the monitor's
//! classifier programs against; [`SmtpNotifier`] is the production
//! implementation.

pub mod error;
pub mod format;
pub mod smtp;

pub use error::NotifyError;
pub use smtp::{Notifier, SmtpNotifier};
