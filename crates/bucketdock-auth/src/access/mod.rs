//! Capability checks.

pub mod capabilities;
pub mod rbac;

pub use capabilities::BucketAccess;
pub use rbac::{require_admin, require_user};
