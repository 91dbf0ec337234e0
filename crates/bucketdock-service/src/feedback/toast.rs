//! Loading toast guard.

use std::sync::Arc;

use bucketdock_core::error::AppError;

use super::notifier::{Notifier, ToastId};

/// A loading toast that is dismissed exactly once.
///
/// The toast is dismissed when the action finishes, when a new stage
/// message replaces it, or when the guard is dropped.
#[derive(Debug)]
pub struct LoadingToast {
    notifier: Arc<dyn Notifier>,
    id: Option<ToastId>,
}

impl LoadingToast {
    /// Show `message` as a loading toast.
    pub fn start(notifier: &Arc<dyn Notifier>, message: &str) -> Self {
        let id = notifier.loading(message);
        Self {
            notifier: Arc::clone(notifier),
            id: Some(id),
        }
    }

    /// Replace the current message with the next stage.
    pub fn stage(&mut self, message: &str) {
        self.dismiss();
        self.id = Some(self.notifier.loading(message));
    }

    /// Finish with a success toast.
    pub fn succeed(mut self, message: &str) {
        self.dismiss();
        self.notifier.success(message);
    }

    /// Finish with an error toast of the form `"{action}: {error}"`.
    ///
    /// Returns the error so callers can propagate it.
    pub fn fail(mut self, action: &str, error: AppError) -> AppError {
        self.dismiss();
        tracing::error!(action, error = %error, "Action failed");
        self.notifier.error(&format!("{action}: {}", error.message));
        error
    }

    /// Dismiss without another toast.
    pub fn finish(mut self) {
        self.dismiss();
    }

    fn dismiss(&mut self) {
        if let Some(id) = self.id.take() {
            self.notifier.dismiss(id);
        }
    }
}

impl Drop for LoadingToast {
    fn drop(&mut self) {
        self.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Counting {
        shown: Mutex<Vec<ToastId>>,
        dismissed: Mutex<Vec<ToastId>>,
    }

    impl Notifier for Counting {
        fn loading(&self, _message: &str) -> ToastId {
            let mut shown = self.shown.lock().unwrap();
            let id = ToastId(shown.len() as u64);
            shown.push(id);
            id
        }
        fn dismiss(&self, id: ToastId) {
            self.dismissed.lock().unwrap().push(id);
        }
        fn success(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
    }

    #[test]
    fn test_each_toast_dismissed_once() {
        let counting = Arc::new(Counting::default());
        let notifier: Arc<dyn Notifier> = counting.clone();

        let mut toast = LoadingToast::start(&notifier, "one");
        toast.stage("two");
        toast.succeed("done");
        {
            let _dropped = LoadingToast::start(&notifier, "three");
        }

        assert_eq!(
            *counting.dismissed.lock().unwrap(),
            vec![ToastId(0), ToastId(1), ToastId(2)]
        );
    }
}
