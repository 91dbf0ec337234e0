//! In-memory backend.
//!
//! Row-level policies are reduced to the checks the client relies on:
//! owner-only bucket and membership edits, admin-only functions and
//! procedures, visibility of private buckets. Every remote procedure and
//! function call is recorded, and failures can be injected per call name.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::types::{BucketId, PageRequest, SpaceRequestId, UserId};
use bucketdock_entity::bucket::{Bucket, CreateBucket, PublicLevel};
use bucketdock_entity::member::{BucketMember, MemberRole};
use bucketdock_entity::profile::{NewUserInvite, Profile, UpdateProfile, UserAccount, UserRole};
use bucketdock_entity::session::AuthSession;
use bucketdock_entity::space_request::{CreateSpaceRequest, SpaceRequest, SpaceRequestStatus};

use crate::traits::{AuthProvider, MetadataBackend};

/// Default quota for new accounts (1 GiB).
const DEFAULT_SPACE_LIMIT: i64 = 1024 * 1024 * 1024;

/// A recorded remote procedure or function call.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    /// Procedure or function name.
    pub name: String,
    /// Arguments as sent on the wire.
    pub args: Value,
}

#[derive(Debug, Clone)]
struct MemoryUser {
    password: String,
    profile: Profile,
}

#[derive(Debug, Default)]
struct BackendState {
    users: HashMap<UserId, MemoryUser>,
    buckets: Vec<Bucket>,
    members: HashMap<BucketId, Vec<(UserId, MemberRole)>>,
    space_requests: Vec<SpaceRequest>,
    refresh_tokens: HashMap<String, UserId>,
    current: Option<UserId>,
    calls: Vec<RpcCall>,
    password_resets: Vec<(String, String)>,
    failures: HashMap<String, AppError>,
}

impl BackendState {
    fn check(&self, op: &str) -> AppResult<()> {
        match self.failures.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn record(&mut self, name: &str, args: Value) {
        self.calls.push(RpcCall {
            name: name.to_string(),
            args,
        });
    }

    fn caller(&self) -> AppResult<UserId> {
        self.current
            .ok_or_else(|| AppError::authentication("JWT required"))
    }

    fn caller_is_admin(&self) -> bool {
        self.current
            .and_then(|id| self.users.get(&id))
            .is_some_and(|u| u.profile.is_admin())
    }

    fn require_admin(&self) -> AppResult<()> {
        if self.caller_is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization("Unauthorized: Not an admin"))
        }
    }

    fn bucket(&self, id: BucketId) -> AppResult<&Bucket> {
        self.buckets
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(format!("Bucket {id} not found")))
    }

    fn require_owner(&self, id: BucketId) -> AppResult<()> {
        let caller = self.caller()?;
        if self.bucket(id)?.is_owned_by(&caller) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Only the bucket owner can manage access",
            ))
        }
    }

    fn is_member(&self, bucket: &Bucket, user: UserId) -> bool {
        bucket.is_owned_by(&user)
            || self
                .members
                .get(&bucket.id)
                .is_some_and(|m| m.iter().any(|(u, _)| *u == user))
    }

    fn can_see(&self, bucket: &Bucket) -> bool {
        bucket.public_level.allows_anonymous_read()
            || self.current.is_some_and(|u| self.is_member(bucket, u))
    }

    fn find_user_by_email(&self, email: &str) -> Option<UserId> {
        self.users
            .iter()
            .find(|(_, u)| {
                u.profile
                    .email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .map(|(id, _)| *id)
    }

    fn issue_session(&mut self, user: UserId) -> AuthSession {
        let refresh_token = format!("refresh-{}", Uuid::new_v4());
        self.refresh_tokens.insert(refresh_token.clone(), user);
        AuthSession {
            access_token: format!("access-{}", Uuid::new_v4()),
            refresh_token,
            expires_at: Utc::now() + Duration::hours(1),
            user_id: user,
            email: self.users.get(&user).and_then(|u| u.profile.email.clone()),
            is_recovery: false,
        }
    }
}

/// In-memory metadata and auth backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<BackendState>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register an account with a profile and return its id.
    pub fn add_user(&self, email: &str, password: &str, role: UserRole) -> UserId {
        let id = UserId::new();
        let profile = Profile {
            id,
            full_name: None,
            email: Some(email.to_string()),
            role,
            is_active: true,
            space_limit: DEFAULT_SPACE_LIMIT,
            space_used: 0,
        };
        self.lock().users.insert(
            id,
            MemoryUser {
                password: password.to_string(),
                profile,
            },
        );
        id
    }

    /// Current profile row of a user.
    pub fn profile(&self, id: UserId) -> Option<Profile> {
        self.lock().users.get(&id).map(|u| u.profile.clone())
    }

    /// Overwrite fields of a profile row directly.
    pub fn edit_profile(&self, id: UserId, edit: impl FnOnce(&mut Profile)) {
        if let Some(user) = self.lock().users.get_mut(&id) {
            edit(&mut user.profile);
        }
    }

    /// Make every future call named `op` fail with `error`.
    ///
    /// Names are the remote procedure/function names, or the trait method
    /// name for table and auth calls (`insert_bucket`, `get_profile`, …).
    pub fn inject_failure(&self, op: &str, error: AppError) {
        self.lock().failures.insert(op.to_string(), error);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Every recorded procedure/function call, in order.
    pub fn calls(&self) -> Vec<RpcCall> {
        self.lock().calls.clone()
    }

    /// Recorded calls named `name`.
    pub fn calls_named(&self, name: &str) -> Vec<RpcCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.name == name)
            .cloned()
            .collect()
    }

    /// Password-reset emails sent, as `(email, redirect_to)`.
    pub fn password_resets(&self) -> Vec<(String, String)> {
        self.lock().password_resets.clone()
    }

    /// All bucket rows regardless of visibility.
    pub fn bucket_rows(&self) -> Vec<Bucket> {
        self.lock().buckets.clone()
    }

    /// The user bound by the last `use_session` call.
    pub fn current_user(&self) -> Option<UserId> {
        self.lock().current
    }
}

#[async_trait]
impl MetadataBackend for MemoryBackend {
    fn use_session(&self, session: Option<&AuthSession>) {
        self.lock().current = session.map(|s| s.user_id);
    }

    async fn list_buckets(&self, page: &PageRequest) -> AppResult<Vec<Bucket>> {
        let state = self.lock();
        state.check("list_buckets")?;
        let caller = state.caller()?;
        Ok(state
            .buckets
            .iter()
            .filter(|b| state.is_member(b, caller))
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn list_all_buckets(&self) -> AppResult<Vec<Bucket>> {
        let state = self.lock();
        state.check("list_all_buckets")?;
        let caller = state.caller()?;
        let mut buckets: Vec<Bucket> = state
            .buckets
            .iter()
            .filter(|b| state.is_member(b, caller))
            .cloned()
            .collect();
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(buckets)
    }

    async fn find_bucket(&self, name: &str) -> AppResult<Option<Bucket>> {
        let state = self.lock();
        state.check("find_bucket")?;
        Ok(state
            .buckets
            .iter()
            .find(|b| b.name == name)
            .filter(|b| state.can_see(b))
            .cloned())
    }

    async fn insert_bucket(&self, bucket: &CreateBucket) -> AppResult<Bucket> {
        let mut state = self.lock();
        state.check("insert_bucket")?;
        let caller = state.caller()?;
        if bucket.owner_id != caller {
            return Err(AppError::authorization(
                "new row violates row-level security policy for table \"buckets\"",
            ));
        }
        if state.buckets.iter().any(|b| b.name == bucket.name) {
            return Err(AppError::conflict(format!(
                "duplicate key value violates unique constraint \"buckets_name_key\" ({})",
                bucket.name
            )));
        }
        let row = Bucket {
            id: BucketId::new(),
            name: bucket.name.clone(),
            owner_id: bucket.owner_id,
            public_level: bucket.public_level,
            created_at: Some(Utc::now()),
        };
        state.buckets.push(row.clone());
        Ok(row)
    }

    async fn delete_bucket(&self, id: BucketId) -> AppResult<()> {
        let mut state = self.lock();
        state.check("delete_bucket")?;
        state.require_owner(id)?;
        state.buckets.retain(|b| b.id != id);
        state.members.remove(&id);
        Ok(())
    }

    async fn update_bucket_level(&self, id: BucketId, level: PublicLevel) -> AppResult<()> {
        let mut state = self.lock();
        state.check("update_bucket_level")?;
        state.require_owner(id)?;
        if let Some(bucket) = state.buckets.iter_mut().find(|b| b.id == id) {
            bucket.public_level = level;
        }
        Ok(())
    }

    async fn get_bucket_members(&self, bucket: BucketId) -> AppResult<Vec<BucketMember>> {
        let mut state = self.lock();
        state.record("get_bucket_members", json!({ "p_bucket_id": bucket }));
        state.check("get_bucket_members")?;
        let row = state.bucket(bucket)?.clone();
        if !state.can_see(&row) {
            return Err(AppError::authorization("Not a member of this bucket"));
        }
        let email_of = |id: &UserId| {
            state
                .users
                .get(id)
                .and_then(|u| u.profile.email.clone())
                .unwrap_or_default()
        };
        let mut members = vec![BucketMember {
            user_id: row.owner_id,
            email: email_of(&row.owner_id),
            is_owner: true,
            role: MemberRole::Owner,
        }];
        if let Some(list) = state.members.get(&bucket) {
            members.extend(list.iter().map(|(user, role)| BucketMember {
                user_id: *user,
                email: email_of(user),
                is_owner: false,
                role: *role,
            }));
        }
        Ok(members)
    }

    async fn invite_user_to_bucket(
        &self,
        bucket: BucketId,
        email: &str,
        role: MemberRole,
    ) -> AppResult<()> {
        let mut state = self.lock();
        state.record(
            "invite_user_to_bucket",
            json!({ "p_bucket_id": bucket, "p_user_email": email, "p_role": role }),
        );
        state.check("invite_user_to_bucket")?;
        state.require_owner(bucket)?;
        let user = state
            .find_user_by_email(email)
            .ok_or_else(|| AppError::validation(format!("User with email {email} not found")))?;
        let row = state.bucket(bucket)?.clone();
        if state.is_member(&row, user) {
            return Err(AppError::conflict(format!(
                "{email} is already a member of this bucket"
            )));
        }
        state.members.entry(bucket).or_default().push((user, role));
        Ok(())
    }

    async fn remove_bucket_member(&self, bucket: BucketId, user: UserId) -> AppResult<String> {
        let mut state = self.lock();
        state.record(
            "remove_bucket_member",
            json!({ "p_bucket_id": bucket, "p_user_id_to_remove": user }),
        );
        state.check("remove_bucket_member")?;
        state.require_owner(bucket)?;
        let list = state.members.entry(bucket).or_default();
        let before = list.len();
        list.retain(|(u, _)| *u != user);
        if list.len() == before {
            return Err(AppError::not_found("User is not a member of this bucket"));
        }
        Ok("User removed from bucket successfully.".to_string())
    }

    async fn update_bucket_member_role(
        &self,
        bucket: BucketId,
        member: UserId,
        role: MemberRole,
    ) -> AppResult<()> {
        let mut state = self.lock();
        state.record(
            "update_bucket_member_role",
            json!({ "p_bucket_id": bucket, "p_member_id": member, "p_new_role": role }),
        );
        state.check("update_bucket_member_role")?;
        state.require_owner(bucket)?;
        let entry = state
            .members
            .get_mut(&bucket)
            .and_then(|list| list.iter_mut().find(|(u, _)| *u == member))
            .ok_or_else(|| AppError::not_found("User is not a member of this bucket"))?;
        entry.1 = role;
        Ok(())
    }

    async fn get_profile(&self, id: UserId) -> AppResult<Profile> {
        let state = self.lock();
        state.check("get_profile")?;
        let caller = state.caller()?;
        if caller != id && !state.caller_is_admin() {
            return Err(AppError::not_found(format!("Profile {id} not found")));
        }
        state
            .users
            .get(&id)
            .map(|u| u.profile.clone())
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))
    }

    async fn update_profile(&self, id: UserId, update: &UpdateProfile) -> AppResult<()> {
        let mut state = self.lock();
        state.check("update_profile")?;
        state.require_admin()?;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))?;
        if let Some(role) = update.role {
            user.profile.role = role;
        }
        if let Some(active) = update.is_active {
            user.profile.is_active = active;
        }
        if let Some(limit) = update.space_limit {
            user.profile.space_limit = limit;
        }
        Ok(())
    }

    async fn adjust_space_used(&self, space_change: i64) -> AppResult<()> {
        let mut state = self.lock();
        state.record("adjust_space_used", json!({ "space_change": space_change }));
        state.check("adjust_space_used")?;
        let caller = state.caller()?;
        let user = state
            .users
            .get_mut(&caller)
            .ok_or_else(|| AppError::not_found("Profile not found"))?;
        user.profile.space_used = (user.profile.space_used + space_change).max(0);
        Ok(())
    }

    async fn get_total_used_space(&self) -> AppResult<i64> {
        let mut state = self.lock();
        state.record("get_total_used_space", json!({}));
        state.check("get_total_used_space")?;
        state.require_admin()?;
        Ok(state.users.values().map(|u| u.profile.space_used).sum())
    }

    async fn insert_space_request(&self, request: &CreateSpaceRequest) -> AppResult<SpaceRequest> {
        let mut state = self.lock();
        state.check("insert_space_request")?;
        let caller = state.caller()?;
        if request.user_id != caller {
            return Err(AppError::authorization(
                "new row violates row-level security policy for table \"space_requests\"",
            ));
        }
        let row = SpaceRequest {
            id: SpaceRequestId::new(),
            user_id: request.user_id,
            requested_space: request.requested_space,
            reason: request.reason.clone(),
            status: SpaceRequestStatus::Pending,
            admin_notes: None,
            created_at: Utc::now(),
            email: state
                .users
                .get(&caller)
                .and_then(|u| u.profile.email.clone()),
        };
        state.space_requests.push(row.clone());
        Ok(row)
    }

    async fn list_space_requests(&self, user: Option<UserId>) -> AppResult<Vec<SpaceRequest>> {
        let state = self.lock();
        state.check("list_space_requests")?;
        let caller = state.caller()?;
        let admin = state.caller_is_admin();
        let mut rows: Vec<SpaceRequest> = state
            .space_requests
            .iter()
            .filter(|r| admin || r.user_id == caller)
            .filter(|r| user.is_none_or(|u| r.user_id == u))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn approve_space_request(&self, id: SpaceRequestId) -> AppResult<()> {
        let mut state = self.lock();
        state.record("approve_space_request", json!({ "p_request_id": id }));
        state.check("approve_space_request")?;
        state.require_admin()?;
        let request = state
            .space_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(format!("Space request {id} not found")))?;
        if request.status.is_final() {
            return Err(AppError::conflict("Request has already been processed"));
        }
        request.status = SpaceRequestStatus::Approved;
        let (user, amount) = (request.user_id, request.requested_space);
        if let Some(u) = state.users.get_mut(&user) {
            u.profile.space_limit += amount;
        }
        Ok(())
    }

    async fn reject_space_request(&self, id: SpaceRequestId, notes: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.record(
            "reject_space_request",
            json!({ "p_request_id": id, "p_notes": notes }),
        );
        state.check("reject_space_request")?;
        state.require_admin()?;
        let request = state
            .space_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(format!("Space request {id} not found")))?;
        if request.status.is_final() {
            return Err(AppError::conflict("Request has already been processed"));
        }
        request.status = SpaceRequestStatus::Rejected;
        request.admin_notes = Some(notes.to_string());
        Ok(())
    }

    async fn get_all_users(&self) -> AppResult<Vec<UserAccount>> {
        let mut state = self.lock();
        state.record("get-all-users", json!({}));
        state.check("get-all-users")?;
        state.require_admin()?;
        let mut users: Vec<UserAccount> = state
            .users
            .values()
            .map(|u| UserAccount::from(u.profile.clone()))
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn invite_user(&self, invite: &NewUserInvite) -> AppResult<()> {
        {
            let mut state = self.lock();
            state.record("invite-user", json!(invite));
            state.check("invite-user")?;
            state.require_admin()?;
            if state.find_user_by_email(&invite.email).is_some() {
                return Err(AppError::conflict(
                    "A user with this email address has already been registered",
                ));
            }
        }
        self.add_user(&invite.email, "", invite.role);
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> AppResult<()> {
        let mut state = self.lock();
        state.record("delete-user", json!({ "userId": id }));
        state.check("delete-user")?;
        state.require_admin()?;
        state
            .users
            .remove(&id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        for list in state.members.values_mut() {
            list.retain(|(u, _)| *u != id);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let mut state = self.lock();
        state.check("sign_in_with_password")?;
        let user = state
            .find_user_by_email(email)
            .filter(|id| {
                state
                    .users
                    .get(id)
                    .is_some_and(|u| !u.password.is_empty() && u.password == password)
            })
            .ok_or_else(|| AppError::authentication("Invalid login credentials"))?;
        Ok(state.issue_session(user))
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<Option<AuthSession>> {
        {
            let state = self.lock();
            state.check("sign_up")?;
            if password.chars().count() < 6 {
                return Err(AppError::validation(
                    "Password should be at least 6 characters",
                ));
            }
            if state.find_user_by_email(email).is_some() {
                return Err(AppError::conflict("User already registered"));
            }
        }
        let id = self.add_user(email, password, UserRole::User);
        Ok(Some(self.lock().issue_session(id)))
    }

    async fn sign_out(&self, session: &AuthSession) -> AppResult<()> {
        let mut state = self.lock();
        state.check("sign_out")?;
        state.refresh_tokens.remove(&session.refresh_token);
        Ok(())
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let mut state = self.lock();
        state.check("refresh_session")?;
        let user = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AppError::authentication("Invalid Refresh Token"))?;
        Ok(state.issue_session(user))
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.check("reset_password_for_email")?;
        state
            .password_resets
            .push((email.to_string(), redirect_to.to_string()));
        Ok(())
    }

    async fn update_password(&self, session: &AuthSession, new_password: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.check("update_password")?;
        let user = state
            .users
            .get_mut(&session.user_id)
            .ok_or_else(|| AppError::authentication("User not found"))?;
        user.password = new_password.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_private_bucket_hidden_from_strangers() {
        let backend = MemoryBackend::new();
        let owner = backend.add_user("owner@x.com", "secret1", UserRole::User);
        let _other = backend.add_user("other@x.com", "secret2", UserRole::User);

        let session = backend
            .sign_in_with_password("owner@x.com", "secret1")
            .await
            .unwrap();
        backend.use_session(Some(&session));
        backend
            .insert_bucket(&CreateBucket {
                name: "photos".into(),
                owner_id: owner,
                public_level: PublicLevel::Private,
            })
            .await
            .unwrap();

        let other = backend
            .sign_in_with_password("other@x.com", "secret2")
            .await
            .unwrap();
        backend.use_session(Some(&other));
        assert!(backend.find_bucket("photos").await.unwrap().is_none());

        backend.use_session(None);
        assert!(backend.find_bucket("photos").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_functions_require_admin() {
        let backend = MemoryBackend::new();
        backend.add_user("u@x.com", "secret1", UserRole::User);
        let session = backend
            .sign_in_with_password("u@x.com", "secret1")
            .await
            .unwrap();
        backend.use_session(Some(&session));
        let err = backend.get_all_users().await.unwrap_err();
        assert_eq!(err.kind, bucketdock_core::ErrorKind::Authorization);
        assert_eq!(backend.calls_named("get-all-users").len(), 1);
    }

    #[tokio::test]
    async fn test_adjust_space_used_never_negative() {
        let backend = MemoryBackend::new();
        let id = backend.add_user("u@x.com", "secret1", UserRole::User);
        let session = backend
            .sign_in_with_password("u@x.com", "secret1")
            .await
            .unwrap();
        backend.use_session(Some(&session));
        backend.adjust_space_used(100).await.unwrap();
        backend.adjust_space_used(-250).await.unwrap();
        assert_eq!(backend.profile(id).unwrap().space_used, 0);
    }
}
