//! Progress and outcome reporting for user-initiated actions.
//!
//! An action goes idle → in flight → success or error. The in-flight
//! phase is a loading toast that must be dismissed exactly once.

pub mod notifier;
pub mod state;
pub mod toast;

pub use notifier::{Notifier, ToastId, TracingNotifier};
pub use state::ActionState;
pub use toast::LoadingToast;
