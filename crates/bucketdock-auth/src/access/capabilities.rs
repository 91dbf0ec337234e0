//! What a viewer may do inside one bucket.

use serde::{Deserialize, Serialize};

use bucketdock_core::error::AppError;
use bucketdock_core::types::UserId;
use bucketdock_entity::bucket::{Bucket, PublicLevel};
use bucketdock_entity::member::{BucketMember, MemberRole};

/// Resolved capabilities of a viewer on a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketAccess {
    /// List, preview and download.
    pub can_read: bool,
    /// Upload, create folders, delete.
    pub can_write: bool,
    /// Change visibility, manage members, delete the bucket.
    pub can_manage: bool,
}

impl BucketAccess {
    /// Combine ownership, membership role and public level.
    pub fn resolve(bucket: &Bucket, viewer: Option<UserId>, membership: Option<MemberRole>) -> Self {
        if viewer.is_some_and(|v| bucket.is_owned_by(&v)) {
            return Self {
                can_read: true,
                can_write: true,
                can_manage: true,
            };
        }

        let mut access = match bucket.public_level {
            PublicLevel::Private => Self::default(),
            PublicLevel::ReadOnly => Self {
                can_read: true,
                ..Self::default()
            },
            PublicLevel::ReadWrite => Self {
                can_read: true,
                can_write: true,
                can_manage: false,
            },
        };

        if viewer.is_some() {
            match membership {
                Some(MemberRole::Owner) => {
                    access.can_read = true;
                    access.can_write = true;
                    access.can_manage = true;
                }
                Some(MemberRole::ReadWrite) => {
                    access.can_read = true;
                    access.can_write = true;
                }
                Some(MemberRole::ReadOnly) => access.can_read = true,
                None => {}
            }
        }
        access
    }

    /// Resolve from a member list as returned by `get_bucket_members`.
    pub fn from_members(bucket: &Bucket, viewer: Option<UserId>, members: &[BucketMember]) -> Self {
        let membership = viewer.and_then(|v| {
            members
                .iter()
                .find(|m| m.user_id == v)
                .map(|m| if m.is_owner { MemberRole::Owner } else { m.role })
        });
        Self::resolve(bucket, viewer, membership)
    }

    /// Fail unless the viewer can read.
    pub fn require_read(&self) -> Result<(), AppError> {
        if self.can_read {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Bucket not found or you don't have permission to view it.",
            ))
        }
    }

    /// Fail unless the viewer can write.
    pub fn require_write(&self) -> Result<(), AppError> {
        if self.can_write {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You don't have permission to modify this bucket.",
            ))
        }
    }

    /// Fail unless the viewer can manage the bucket.
    pub fn require_manage(&self) -> Result<(), AppError> {
        if self.can_manage {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Only the bucket owner can do this.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdock_core::types::BucketId;

    fn bucket(owner: UserId, level: PublicLevel) -> Bucket {
        Bucket {
            id: BucketId::new(),
            name: "b".into(),
            owner_id: owner,
            public_level: level,
            created_at: None,
        }
    }

    #[test]
    fn test_owner_has_everything() {
        let owner = UserId::new();
        let access = BucketAccess::resolve(&bucket(owner, PublicLevel::Private), Some(owner), None);
        assert!(access.can_read && access.can_write && access.can_manage);
    }

    #[test]
    fn test_anonymous_by_public_level() {
        let b = bucket(UserId::new(), PublicLevel::ReadWrite);
        let access = BucketAccess::resolve(&b, None, None);
        assert!(access.can_read && access.can_write && !access.can_manage);

        let b = bucket(UserId::new(), PublicLevel::Private);
        assert_eq!(BucketAccess::resolve(&b, None, None), BucketAccess::default());
    }

    #[test]
    fn test_member_roles() {
        let b = bucket(UserId::new(), PublicLevel::Private);
        let viewer = Some(UserId::new());
        let ro = BucketAccess::resolve(&b, viewer, Some(MemberRole::ReadOnly));
        assert!(ro.can_read && !ro.can_write);
        let rw = BucketAccess::resolve(&b, viewer, Some(MemberRole::ReadWrite));
        assert!(rw.can_write && !rw.can_manage);
    }
}
