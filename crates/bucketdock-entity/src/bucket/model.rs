//! Bucket entity model.

use bucketdock_core::types::{BucketId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::level::PublicLevel;

/// A row of the `buckets` table. The name is also the object-store
/// bucket name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Unique bucket identifier.
    pub id: BucketId,
    /// Unique bucket name.
    pub name: String,
    /// The user who created the bucket.
    pub owner_id: UserId,
    /// Visibility for non-members.
    #[serde(default)]
    pub public_level: PublicLevel,
    /// When the bucket was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Bucket {
    /// Check whether `user` owns this bucket.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }
}

/// Data required to insert a bucket row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBucket {
    /// Bucket name.
    pub name: String,
    /// Owning user.
    pub owner_id: UserId,
    /// Initial visibility.
    pub public_level: PublicLevel,
}
