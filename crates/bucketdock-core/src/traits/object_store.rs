//! Object store trait for S3-compatible backends.
//!
//! The trait is defined here in `bucketdock-core` and implemented in
//! `bucketdock-storage`. Types are wire-neutral so services never see
//! SDK structures.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A bucket as reported by the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// Creation time, when the store reports it.
    pub created_at: Option<DateTime<Utc>>,
}

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Full object key.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modified timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    /// Returns whether this is a folder placeholder (`key` ends in `/`).
    pub fn is_folder_marker(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// Parameters for a single list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsRequest {
    /// Only keys starting with this prefix are returned.
    pub prefix: String,
    /// When set, keys are grouped on this delimiter into common prefixes.
    pub delimiter: Option<String>,
    /// Token from the previous page.
    pub continuation_token: Option<String>,
    /// Upper bound on keys returned in this page.
    pub max_keys: Option<u32>,
}

impl ListObjectsRequest {
    /// A `/`-delimited listing of the immediate children of `prefix`.
    pub fn delimited(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: Some("/".to_string()),
            ..Self::default()
        }
    }

    /// A flat listing of every key under `prefix`.
    pub fn recursive(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Same request, continuing from `token`.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }

    /// Same request, capped at `max_keys` per page.
    pub fn with_max_keys(mut self, max_keys: u32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPage {
    /// Common prefixes (folders), each ending in the delimiter.
    pub folders: Vec<String>,
    /// Objects on this page.
    pub objects: Vec<ObjectMeta>,
    /// Present when more pages remain.
    pub next_continuation_token: Option<String>,
}

/// One version of an object, or a delete marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Object key.
    pub key: String,
    /// Store-assigned version id (`"null"` on unversioned buckets).
    pub version_id: String,
    /// Whether this is the current version of the key.
    pub is_latest: bool,
    /// Size in bytes (zero for delete markers).
    pub size: u64,
    /// Last modified timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

/// One page of a version listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPage {
    /// Object versions.
    pub versions: Vec<VersionEntry>,
    /// Delete markers.
    pub delete_markers: Vec<VersionEntry>,
    /// Whether more pages remain.
    pub is_truncated: bool,
    /// Key marker to resume from.
    pub next_key_marker: Option<String>,
    /// Version id marker to resume from.
    pub next_version_id_marker: Option<String>,
}

/// Parameters for a single version-list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListVersionsRequest {
    /// Only keys starting with this prefix are returned.
    pub prefix: Option<String>,
    /// Resume after this key.
    pub key_marker: Option<String>,
    /// Resume after this version of `key_marker`.
    pub version_id_marker: Option<String>,
}

/// Identifies an object (or one version of it) for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentifier {
    /// Object key.
    pub key: String,
    /// Optional version id.
    pub version_id: Option<String>,
}

impl ObjectIdentifier {
    /// Identify the current version of `key`.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: None,
        }
    }

    /// Identify a specific version of `key`.
    pub fn version(key: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: Some(version_id.into()),
        }
    }
}

/// Trait for S3-compatible object stores.
///
/// Every call is a single request to the store. Pagination, batching and
/// quota bookkeeping are the caller's concern.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// List all buckets visible to the configured credentials.
    async fn list_buckets(&self) -> AppResult<Vec<BucketSummary>>;

    /// Create a bucket.
    async fn create_bucket(&self, bucket: &str) -> AppResult<()>;

    /// Delete an empty bucket.
    async fn delete_bucket(&self, bucket: &str) -> AppResult<()>;

    /// Turn on object versioning for a bucket.
    async fn enable_versioning(&self, bucket: &str) -> AppResult<()>;

    /// List one page of objects.
    async fn list_objects(&self, bucket: &str, request: &ListObjectsRequest)
    -> AppResult<ObjectPage>;

    /// List one page of object versions and delete markers.
    async fn list_versions(
        &self,
        bucket: &str,
        request: &ListVersionsRequest,
    ) -> AppResult<VersionPage>;

    /// Store `body` at `key`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> AppResult<()>;

    /// Read the object at `key`, optionally a specific version.
    async fn get_object(&self, bucket: &str, key: &str, version_id: Option<&str>)
    -> AppResult<Bytes>;

    /// Delete the object at `key`, optionally a specific version.
    async fn delete_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> AppResult<()>;

    /// Delete up to [`MAX_DELETE_BATCH`](crate::limits::MAX_DELETE_BATCH)
    /// objects in one request.
    async fn delete_objects(&self, bucket: &str, objects: &[ObjectIdentifier]) -> AppResult<()>;

    /// Copy `version_id` of `key` over the current version of `key`.
    async fn restore_version(&self, bucket: &str, key: &str, version_id: &str) -> AppResult<()>;

    /// Create a presigned GET URL valid for `expires_in_secs`.
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
        expires_in_secs: u64,
    ) -> AppResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let req = ListObjectsRequest::delimited("photos/").with_token(Some("t1".into()));
        assert_eq!(req.delimiter.as_deref(), Some("/"));
        assert_eq!(req.continuation_token.as_deref(), Some("t1"));
        assert!(ListObjectsRequest::recursive("a/").delimiter.is_none());
    }

    #[test]
    fn test_folder_marker() {
        let meta = ObjectMeta {
            key: "docs/".into(),
            size: 0,
            last_modified: None,
        };
        assert!(meta.is_folder_marker());
    }
}
