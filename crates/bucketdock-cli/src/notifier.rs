//! Toasts printed to the terminal.

use std::sync::atomic::{AtomicU64, Ordering};

use bucketdock_service::feedback::{Notifier, ToastId};

use crate::output;

/// Prints loading, success and error toasts.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    next: AtomicU64,
    quiet: bool,
}

impl ConsoleNotifier {
    /// A notifier that prints everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that only prints errors. Used with JSON output.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn loading(&self, message: &str) -> ToastId {
        if !self.quiet {
            output::print_progress(message);
        }
        ToastId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    fn dismiss(&self, _id: ToastId) {}

    fn success(&self, message: &str) {
        if !self.quiet {
            output::print_success(message);
        }
    }

    fn error(&self, message: &str) {
        output::print_error(message);
    }
}
