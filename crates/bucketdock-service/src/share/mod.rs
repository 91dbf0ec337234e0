//! Temporary share links.

pub mod expiry;
pub mod service;

pub use expiry::ExpiryDuration;
pub use service::{ShareLink, ShareService};
