//! Client-side routes and their guard.

pub mod guard;
pub mod path;

pub use guard::{GuardDecision, RouteGuard};
pub use path::Route;
