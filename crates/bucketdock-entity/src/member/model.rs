//! Bucket member model.

use bucketdock_core::types::UserId;
use serde::{Deserialize, Serialize};

use super::role::MemberRole;

/// One row returned by the `get_bucket_members` procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketMember {
    /// Member's user id.
    pub user_id: UserId,
    /// Member's email address.
    pub email: String,
    /// Whether the member owns the bucket.
    #[serde(default)]
    pub is_owner: bool,
    /// The member's role.
    pub role: MemberRole,
}
