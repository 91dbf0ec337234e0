//! Backend traits implemented by the REST client and the in-memory double.

use async_trait::async_trait;

use bucketdock_core::result::AppResult;
use bucketdock_core::types::{BucketId, PageRequest, SpaceRequestId, UserId};
use bucketdock_entity::bucket::{Bucket, CreateBucket, PublicLevel};
use bucketdock_entity::member::{BucketMember, MemberRole};
use bucketdock_entity::profile::{NewUserInvite, Profile, UpdateProfile, UserAccount};
use bucketdock_entity::session::AuthSession;
use bucketdock_entity::space_request::{CreateSpaceRequest, SpaceRequest};

/// Tables, remote procedures and serverless functions.
///
/// Every call runs as the session bound with [`use_session`], or
/// anonymously when none is bound.
///
/// [`use_session`]: MetadataBackend::use_session
#[async_trait]
pub trait MetadataBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Bind (or clear) the session whose token authorizes later calls.
    fn use_session(&self, session: Option<&AuthSession>);

    /// One offset page of visible buckets, oldest first.
    async fn list_buckets(&self, page: &PageRequest) -> AppResult<Vec<Bucket>>;

    /// Every visible bucket.
    async fn list_all_buckets(&self) -> AppResult<Vec<Bucket>>;

    /// Look a bucket up by name.
    async fn find_bucket(&self, name: &str) -> AppResult<Option<Bucket>>;

    /// Insert a bucket row and return it.
    async fn insert_bucket(&self, bucket: &CreateBucket) -> AppResult<Bucket>;

    /// Delete a bucket row.
    async fn delete_bucket(&self, id: BucketId) -> AppResult<()>;

    /// Change a bucket's visibility.
    async fn update_bucket_level(&self, id: BucketId, level: PublicLevel) -> AppResult<()>;

    /// `get_bucket_members(p_bucket_id)`
    async fn get_bucket_members(&self, bucket: BucketId) -> AppResult<Vec<BucketMember>>;

    /// `invite_user_to_bucket(p_bucket_id, p_user_email, p_role)`
    async fn invite_user_to_bucket(
        &self,
        bucket: BucketId,
        email: &str,
        role: MemberRole,
    ) -> AppResult<()>;

    /// `remove_bucket_member(p_bucket_id, p_user_id_to_remove)`; returns the
    /// server's confirmation message.
    async fn remove_bucket_member(&self, bucket: BucketId, user: UserId) -> AppResult<String>;

    /// `update_bucket_member_role(p_bucket_id, p_member_id, p_new_role)`
    async fn update_bucket_member_role(
        &self,
        bucket: BucketId,
        member: UserId,
        role: MemberRole,
    ) -> AppResult<()>;

    /// Fetch a profile row.
    async fn get_profile(&self, id: UserId) -> AppResult<Profile>;

    /// Update role, active flag or space limit of a profile.
    async fn update_profile(&self, id: UserId, update: &UpdateProfile) -> AppResult<()>;

    /// `adjust_space_used(space_change)` for the calling user.
    async fn adjust_space_used(&self, space_change: i64) -> AppResult<()>;

    /// `get_total_used_space()`
    async fn get_total_used_space(&self) -> AppResult<i64>;

    /// Insert a space request.
    async fn insert_space_request(&self, request: &CreateSpaceRequest) -> AppResult<SpaceRequest>;

    /// Space requests, newest first, with the requester's email. `None`
    /// lists every request visible to the caller.
    async fn list_space_requests(&self, user: Option<UserId>) -> AppResult<Vec<SpaceRequest>>;

    /// `approve_space_request(p_request_id)`
    async fn approve_space_request(&self, id: SpaceRequestId) -> AppResult<()>;

    /// `reject_space_request(p_request_id, p_notes)`
    async fn reject_space_request(&self, id: SpaceRequestId, notes: &str) -> AppResult<()>;

    /// The `get-all-users` function.
    async fn get_all_users(&self) -> AppResult<Vec<UserAccount>>;

    /// The `invite-user` function.
    async fn invite_user(&self, invite: &NewUserInvite) -> AppResult<()>;

    /// The `delete-user` function.
    async fn delete_user(&self, id: UserId) -> AppResult<()>;
}

/// Password-based authentication.
#[async_trait]
pub trait AuthProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Sign in with email and password.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Register a new account. Returns a session when no email
    /// confirmation is required.
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<Option<AuthSession>>;

    /// Revoke a session.
    async fn sign_out(&self, session: &AuthSession) -> AppResult<()>;

    /// Exchange a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession>;

    /// Send a password-reset email that links to `redirect_to`.
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> AppResult<()>;

    /// Change the password of the session's user.
    async fn update_password(&self, session: &AuthSession, new_password: &str) -> AppResult<()>;
}
