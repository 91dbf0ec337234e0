//! # bucketdock-auth
//!
//! Client-side authentication state for BucketDock: reactive session and
//! profile stores, the request context handed to services, route parsing
//! and guarding, and per-bucket capability resolution.
//!
//! None of this is authoritative. The backend's row-level policies and
//! admin checks make the final decision; these types decide what the view
//! layer shows and which calls it attempts.

pub mod access;
pub mod context;
pub mod route;
pub mod session;

pub use access::{BucketAccess, require_admin, require_user};
pub use context::RequestContext;
pub use route::{GuardDecision, Route, RouteGuard};
pub use session::{
    AuthEvent, AuthSubscription, NavigationIntent, ProfileState, ProfileStore, SessionState,
    SessionStore,
};
