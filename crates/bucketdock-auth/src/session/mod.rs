//! Reactive session and profile state.

pub mod events;
pub mod profile;
pub mod store;

pub use events::{AuthEvent, AuthSubscription, NavigationIntent};
pub use profile::{ProfileState, ProfileStore};
pub use store::{SessionState, SessionStore};
