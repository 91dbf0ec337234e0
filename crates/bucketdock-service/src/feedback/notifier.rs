//! Toast sink.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle of a loading toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(pub u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Where user-facing feedback goes.
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Show a loading message and return its handle.
    fn loading(&self, message: &str) -> ToastId;

    /// Remove a loading message.
    fn dismiss(&self, id: ToastId);

    /// Show a success message.
    fn success(&self, message: &str);

    /// Show an error message.
    fn error(&self, message: &str);
}

/// Notifier that only emits tracing events.
#[derive(Debug, Default)]
pub struct TracingNotifier {
    next: AtomicU64,
}

impl TracingNotifier {
    /// Create a notifier.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for TracingNotifier {
    fn loading(&self, message: &str) -> ToastId {
        let id = ToastId(self.next.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, message, "Loading");
        id
    }

    fn dismiss(&self, id: ToastId) {
        tracing::trace!(%id, "Dismissed");
    }

    fn success(&self, message: &str) {
        tracing::info!(message, "Success");
    }

    fn error(&self, message: &str) {
        tracing::warn!(message, "Error");
    }
}
