//! portwatch-intel: client for the banner intelligence feed.
//!
//! Two halves: a small REST surface (alert registration, account
//! profile) and the streaming firehose of banner events. The
//! [`IntelFeed`] trait is the seam the monitor programs against;
//! [`ShodanClient`] is the production implementation.

pub mod client;
pub mod error;
pub mod stream;

pub use client::{AccountProfile, IntelFeed, ShodanClient};
pub use error::IntelError;
pub use stream::{EventStream, Firehose};
