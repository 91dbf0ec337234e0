//! Tables, remote procedures and functions over REST.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::json;

use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::types::{BucketId, PageRequest, SpaceRequestId, UserId};
use bucketdock_entity::bucket::{Bucket, CreateBucket, PublicLevel};
use bucketdock_entity::member::{BucketMember, MemberRole};
use bucketdock_entity::profile::{NewUserInvite, Profile, UpdateProfile, UserAccount};
use bucketdock_entity::session::AuthSession;
use bucketdock_entity::space_request::{
    CreateSpaceRequest, SpaceRequest, SpaceRequestStatus,
};

use super::RestBackend;
use crate::traits::MetadataBackend;

const BUCKET_COLUMNS: &str = "id,name,owner_id,public_level,created_at";

/// A `space_requests` row joined with `profiles(email)`.
#[derive(Debug, Deserialize)]
struct SpaceRequestRow {
    id: SpaceRequestId,
    user_id: UserId,
    requested_space: i64,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    status: SpaceRequestStatus,
    #[serde(default)]
    admin_notes: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    profiles: Option<EmailJoin>,
}

#[derive(Debug, Deserialize)]
struct EmailJoin {
    email: Option<String>,
}

impl From<SpaceRequestRow> for SpaceRequest {
    fn from(row: SpaceRequestRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            requested_space: row.requested_space,
            reason: row.reason,
            status: row.status,
            admin_notes: row.admin_notes,
            created_at: row.created_at,
            email: row.profiles.and_then(|p| p.email),
        }
    }
}

impl RestBackend {
    fn table_url(&self, table: &str, filters: &[(&str, String)]) -> AppResult<Url> {
        let mut url = self.url(&format!("rest/v1/{table}"))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (column, filter) in filters {
                pairs.append_pair(column, filter);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl MetadataBackend for RestBackend {
    fn use_session(&self, session: Option<&AuthSession>) {
        self.set_token(session.map(|s| s.access_token.clone()));
    }

    async fn list_buckets(&self, page: &PageRequest) -> AppResult<Vec<Bucket>> {
        let url = self.table_url(
            "buckets",
            &[
                ("select", BUCKET_COLUMNS.to_string()),
                ("order", "created_at.asc".to_string()),
            ],
        )?;
        let (from, to) = page.range();
        let request = self
            .request(Method::GET, url)
            .header("Range-Unit", "items")
            .header("Range", format!("{from}-{to}"));
        self.send_json("buckets", request).await
    }

    async fn list_all_buckets(&self) -> AppResult<Vec<Bucket>> {
        let url = self.table_url(
            "buckets",
            &[
                ("select", BUCKET_COLUMNS.to_string()),
                ("order", "name.asc".to_string()),
            ],
        )?;
        self.send_json("buckets", self.request(Method::GET, url))
            .await
    }

    async fn find_bucket(&self, name: &str) -> AppResult<Option<Bucket>> {
        let url = self.table_url(
            "buckets",
            &[
                ("select", BUCKET_COLUMNS.to_string()),
                ("name", format!("eq.{name}")),
            ],
        )?;
        let rows: Vec<Bucket> = self
            .send_json("buckets", self.request(Method::GET, url))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_bucket(&self, bucket: &CreateBucket) -> AppResult<Bucket> {
        let url = self.table_url("buckets", &[("select", BUCKET_COLUMNS.to_string())])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(bucket);
        let rows: Vec<Bucket> = self.send_json("buckets", request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::backend("Bucket insert returned no row"))
    }

    async fn delete_bucket(&self, id: BucketId) -> AppResult<()> {
        let url = self.table_url("buckets", &[("id", format!("eq.{id}"))])?;
        self.send_empty("buckets", self.request(Method::DELETE, url))
            .await
    }

    async fn update_bucket_level(&self, id: BucketId, level: PublicLevel) -> AppResult<()> {
        let url = self.table_url("buckets", &[("id", format!("eq.{id}"))])?;
        let request = self
            .request(Method::PATCH, url)
            .json(&json!({ "public_level": level }));
        self.send_empty("buckets", request).await
    }

    async fn get_bucket_members(&self, bucket: BucketId) -> AppResult<Vec<BucketMember>> {
        self.rpc("get_bucket_members", &json!({ "p_bucket_id": bucket }))
            .await
    }

    async fn invite_user_to_bucket(
        &self,
        bucket: BucketId,
        email: &str,
        role: MemberRole,
    ) -> AppResult<()> {
        self.rpc_void(
            "invite_user_to_bucket",
            &json!({ "p_bucket_id": bucket, "p_user_email": email, "p_role": role }),
        )
        .await
    }

    async fn remove_bucket_member(&self, bucket: BucketId, user: UserId) -> AppResult<String> {
        let message: Option<String> = self
            .rpc(
                "remove_bucket_member",
                &json!({ "p_bucket_id": bucket, "p_user_id_to_remove": user }),
            )
            .await?;
        Ok(message.unwrap_or_else(|| "Member removed.".to_string()))
    }

    async fn update_bucket_member_role(
        &self,
        bucket: BucketId,
        member: UserId,
        role: MemberRole,
    ) -> AppResult<()> {
        self.rpc_void(
            "update_bucket_member_role",
            &json!({ "p_bucket_id": bucket, "p_member_id": member, "p_new_role": role }),
        )
        .await
    }

    async fn get_profile(&self, id: UserId) -> AppResult<Profile> {
        let url = self.table_url(
            "profiles",
            &[("select", "*".to_string()), ("id", format!("eq.{id}"))],
        )?;
        let rows: Vec<Profile> = self
            .send_json("profiles", self.request(Method::GET, url))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))
    }

    async fn update_profile(&self, id: UserId, update: &UpdateProfile) -> AppResult<()> {
        let url = self.table_url("profiles", &[("id", format!("eq.{id}"))])?;
        self.send_empty("profiles", self.request(Method::PATCH, url).json(update))
            .await
    }

    async fn adjust_space_used(&self, space_change: i64) -> AppResult<()> {
        self.rpc_void("adjust_space_used", &json!({ "space_change": space_change }))
            .await
    }

    async fn get_total_used_space(&self) -> AppResult<i64> {
        let total: Option<i64> = self.rpc("get_total_used_space", &json!({})).await?;
        Ok(total.unwrap_or(0))
    }

    async fn insert_space_request(&self, request: &CreateSpaceRequest) -> AppResult<SpaceRequest> {
        let url = self.table_url("space_requests", &[("select", "*".to_string())])?;
        let builder = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(request);
        let rows: Vec<SpaceRequestRow> = self.send_json("space_requests", builder).await?;
        rows.into_iter()
            .next()
            .map(SpaceRequest::from)
            .ok_or_else(|| AppError::backend("Space request insert returned no row"))
    }

    async fn list_space_requests(&self, user: Option<UserId>) -> AppResult<Vec<SpaceRequest>> {
        let mut filters = vec![
            ("select", "*,profiles(email)".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(user) = user {
            filters.push(("user_id", format!("eq.{user}")));
        }
        let url = self.table_url("space_requests", &filters)?;
        let rows: Vec<SpaceRequestRow> = self
            .send_json("space_requests", self.request(Method::GET, url))
            .await?;
        Ok(rows.into_iter().map(SpaceRequest::from).collect())
    }

    async fn approve_space_request(&self, id: SpaceRequestId) -> AppResult<()> {
        self.rpc_void("approve_space_request", &json!({ "p_request_id": id }))
            .await
    }

    async fn reject_space_request(&self, id: SpaceRequestId, notes: &str) -> AppResult<()> {
        self.rpc_void(
            "reject_space_request",
            &json!({ "p_request_id": id, "p_notes": notes }),
        )
        .await
    }

    async fn get_all_users(&self) -> AppResult<Vec<UserAccount>> {
        self.invoke("get-all-users", &json!({})).await
    }

    async fn invite_user(&self, invite: &NewUserInvite) -> AppResult<()> {
        let _: serde_json::Value = self.invoke("invite-user", invite).await?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> AppResult<()> {
        let _: serde_json::Value = self.invoke("delete-user", &json!({ "userId": id })).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_request_row_flattens_email() {
        let row: SpaceRequestRow = serde_json::from_value(json!({
            "id": "7d7f3a52-7d29-4a54-a4b5-1a4c7c1d7e11",
            "user_id": "2b0b8f7e-9f59-4e0f-8f56-4a9b7c3a0d22",
            "requested_space": 1073741824,
            "reason": null,
            "status": "pending",
            "admin_notes": null,
            "created_at": "2024-05-01T10:00:00Z",
            "profiles": { "email": "a@x.com" }
        }))
        .unwrap();
        let request = SpaceRequest::from(row);
        assert_eq!(request.email.as_deref(), Some("a@x.com"));
        assert_eq!(request.status, SpaceRequestStatus::Pending);
    }
}
