//! Bucket membership entities.

pub mod model;
pub mod role;

pub use model::BucketMember;
pub use role::MemberRole;
