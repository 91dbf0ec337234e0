//! In-memory object store.
//!
//! Mirrors the S3 behaviour the services depend on: versioned buckets
//! keep every version and add delete markers, a bucket with any version
//! left refuses deletion, listings are paged. Every call is appended to
//! an operation log and failures can be injected per operation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use bucketdock_core::error::AppError;
use bucketdock_core::limits::{MAX_DELETE_BATCH, MAX_PRESIGN_EXPIRY_SECS};
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::object_store::{
    BucketSummary, ListObjectsRequest, ListVersionsRequest, ObjectIdentifier, ObjectMeta,
    ObjectPage, ObjectStore, VersionEntry, VersionPage,
};

use super::encode_key;

/// Default cap on entries per listing page, as S3 does.
const DEFAULT_PAGE_SIZE: usize = 1000;

/// Operation kinds, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `list_buckets`
    ListBuckets,
    /// `create_bucket`
    CreateBucket,
    /// `delete_bucket`
    DeleteBucket,
    /// `enable_versioning`
    EnableVersioning,
    /// `list_objects`
    ListObjects,
    /// `list_versions`
    ListVersions,
    /// `put_object`
    PutObject,
    /// `get_object`
    GetObject,
    /// `delete_object`
    DeleteObject,
    /// `delete_objects`
    DeleteObjects,
    /// `restore_version`
    RestoreVersion,
    /// `presign_get`
    PresignGet,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// Buckets were listed.
    ListBuckets,
    /// A bucket was created.
    CreateBucket {
        /// Bucket name.
        bucket: String,
    },
    /// A bucket was deleted.
    DeleteBucket {
        /// Bucket name.
        bucket: String,
        /// Versions and delete markers left at the time of the call.
        remaining_versions: usize,
    },
    /// Versioning was enabled.
    EnableVersioning {
        /// Bucket name.
        bucket: String,
    },
    /// Objects were listed.
    ListObjects {
        /// Bucket name.
        bucket: String,
        /// Listing prefix.
        prefix: String,
    },
    /// Versions were listed.
    ListVersions {
        /// Bucket name.
        bucket: String,
    },
    /// An object was written.
    PutObject {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Body size.
        size: usize,
    },
    /// An object was read.
    GetObject {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
    },
    /// A single object was deleted.
    DeleteObject {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Version id, when targeted.
        version_id: Option<String>,
    },
    /// A batch delete was issued.
    DeleteObjects {
        /// Bucket name.
        bucket: String,
        /// Number of identifiers in the batch.
        count: usize,
    },
    /// A version was copied over the current key.
    RestoreVersion {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Restored version.
        version_id: String,
    },
    /// A presigned URL was issued.
    PresignGet {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Expiry in seconds.
        expires_in_secs: u64,
    },
}

#[derive(Debug, Clone)]
struct StoredVersion {
    version_id: String,
    /// `None` for a delete marker.
    data: Option<Bytes>,
    last_modified: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryBucket {
    versioned: bool,
    created_at: Option<DateTime<Utc>>,
    /// Versions per key, oldest first.
    keys: BTreeMap<String, Vec<StoredVersion>>,
}

impl MemoryBucket {
    fn version_count(&self) -> usize {
        self.keys.values().map(Vec::len).sum()
    }

    fn current(&self, key: &str) -> Option<&StoredVersion> {
        self.keys
            .get(key)
            .and_then(|versions| versions.last())
            .filter(|v| v.data.is_some())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    buckets: BTreeMap<String, MemoryBucket>,
    next_version: u64,
    ops: Vec<StoreOp>,
    failures: HashMap<StoreOperation, AppError>,
    key_failures: HashMap<(StoreOperation, String), AppError>,
}

impl MemoryState {
    fn new_version_id(&mut self, versioned: bool) -> String {
        if !versioned {
            return "null".to_string();
        }
        self.next_version += 1;
        format!("v{:08}", self.next_version)
    }

    fn check(&self, op: StoreOperation, key: Option<&str>) -> AppResult<()> {
        if let Some(err) = self.failures.get(&op) {
            return Err(err.clone());
        }
        if let Some(key) = key
            && let Some(err) = self.key_failures.get(&(op, key.to_string()))
        {
            return Err(err.clone());
        }
        Ok(())
    }

    fn bucket(&self, name: &str) -> AppResult<&MemoryBucket> {
        self.buckets
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("NoSuchBucket: {name}")))
    }

    fn bucket_mut(&mut self, name: &str) -> AppResult<&mut MemoryBucket> {
        self.buckets
            .get_mut(name)
            .ok_or_else(|| AppError::not_found(format!("NoSuchBucket: {name}")))
    }

    fn delete_one(&mut self, bucket: &str, key: &str, version_id: Option<&str>) -> AppResult<()> {
        let versioned = self.bucket(bucket)?.versioned;
        let marker_id = self.new_version_id(versioned);
        let b = self.bucket_mut(bucket)?;
        match version_id {
            Some(vid) => {
                if let Some(versions) = b.keys.get_mut(key) {
                    versions.retain(|v| v.version_id != vid);
                    if versions.is_empty() {
                        b.keys.remove(key);
                    }
                }
            }
            None if versioned => {
                if b.keys.contains_key(key) {
                    b.keys.entry(key.to_string()).or_default().push(StoredVersion {
                        version_id: marker_id,
                        data: None,
                        last_modified: Utc::now(),
                    });
                }
            }
            None => {
                b.keys.remove(key);
            }
        }
        Ok(())
    }
}

/// In-memory, versioning-aware object store.
#[derive(Debug)]
pub struct MemoryObjectStore {
    state: Mutex<MemoryState>,
    page_size: usize,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Cap listing pages at `page_size` entries.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every future call of `op` fail with `error`.
    pub fn inject_failure(&self, op: StoreOperation, error: AppError) {
        self.lock().failures.insert(op, error);
    }

    /// Make future calls of `op` on `key` fail with `error`.
    pub fn inject_key_failure(&self, op: StoreOperation, key: &str, error: AppError) {
        self.lock()
            .key_failures
            .insert((op, key.to_string()), error);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.failures.clear();
        state.key_failures.clear();
    }

    /// All calls made so far, in order.
    pub fn operations(&self) -> Vec<StoreOp> {
        self.lock().ops.clone()
    }

    /// Sizes of every batch delete issued, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                StoreOp::DeleteObjects { count, .. } => Some(*count),
                _ => None,
            })
            .collect()
    }

    /// Forget the operation log.
    pub fn clear_operations(&self) {
        self.lock().ops.clear();
    }

    /// Whether `bucket` exists.
    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.lock().buckets.contains_key(bucket)
    }

    /// Whether `bucket` has versioning enabled.
    pub fn is_versioned(&self, bucket: &str) -> bool {
        self.lock()
            .buckets
            .get(bucket)
            .is_some_and(|b| b.versioned)
    }

    /// Number of versions and delete markers stored in `bucket`.
    pub fn version_count(&self, bucket: &str) -> usize {
        self.lock()
            .buckets
            .get(bucket)
            .map_or(0, MemoryBucket::version_count)
    }

    /// Current (non-deleted) keys in `bucket`.
    pub fn current_keys(&self, bucket: &str) -> Vec<String> {
        let state = self.lock();
        state
            .buckets
            .get(bucket)
            .map(|b| {
                b.keys
                    .keys()
                    .filter(|k| b.current(k).is_some())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list_buckets(&self) -> AppResult<Vec<BucketSummary>> {
        let mut state = self.lock();
        state.ops.push(StoreOp::ListBuckets);
        state.check(StoreOperation::ListBuckets, None)?;
        Ok(state
            .buckets
            .iter()
            .map(|(name, b)| BucketSummary {
                name: name.clone(),
                created_at: b.created_at,
            })
            .collect())
    }

    async fn create_bucket(&self, bucket: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.ops.push(StoreOp::CreateBucket {
            bucket: bucket.to_string(),
        });
        state.check(StoreOperation::CreateBucket, Some(bucket))?;
        if state.buckets.contains_key(bucket) {
            return Err(AppError::conflict(format!("BucketAlreadyExists: {bucket}")));
        }
        state.buckets.insert(
            bucket.to_string(),
            MemoryBucket {
                created_at: Some(Utc::now()),
                ..MemoryBucket::default()
            },
        );
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> AppResult<()> {
        let mut state = self.lock();
        let remaining_versions = state
            .buckets
            .get(bucket)
            .map_or(0, MemoryBucket::version_count);
        state.ops.push(StoreOp::DeleteBucket {
            bucket: bucket.to_string(),
            remaining_versions,
        });
        state.check(StoreOperation::DeleteBucket, Some(bucket))?;
        state.bucket(bucket)?;
        if remaining_versions > 0 {
            return Err(AppError::conflict(format!(
                "BucketNotEmpty: {bucket} still holds {remaining_versions} versions"
            )));
        }
        state.buckets.remove(bucket);
        Ok(())
    }

    async fn enable_versioning(&self, bucket: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.ops.push(StoreOp::EnableVersioning {
            bucket: bucket.to_string(),
        });
        state.check(StoreOperation::EnableVersioning, Some(bucket))?;
        state.bucket_mut(bucket)?.versioned = true;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        request: &ListObjectsRequest,
    ) -> AppResult<ObjectPage> {
        let mut state = self.lock();
        state.ops.push(StoreOp::ListObjects {
            bucket: bucket.to_string(),
            prefix: request.prefix.clone(),
        });
        state.check(StoreOperation::ListObjects, Some(bucket))?;
        let b = state.bucket(bucket)?;

        enum Entry {
            Folder(String),
            Object(ObjectMeta),
        }

        let mut entries: Vec<Entry> = Vec::new();
        for (key, versions) in b.keys.range(request.prefix.clone()..) {
            if !key.starts_with(&request.prefix) {
                break;
            }
            let Some(current) = versions.last().filter(|v| v.data.is_some()) else {
                continue;
            };
            let rest = &key[request.prefix.len()..];
            if let Some(delimiter) = request.delimiter.as_deref()
                && let Some(idx) = rest.find(delimiter)
            {
                let folder = format!("{}{}", request.prefix, &rest[..idx + delimiter.len()]);
                let seen = matches!(entries.last(), Some(Entry::Folder(f)) if *f == folder);
                if !seen {
                    entries.push(Entry::Folder(folder));
                }
                continue;
            }
            entries.push(Entry::Object(ObjectMeta {
                key: key.clone(),
                size: current.data.as_ref().map_or(0, |d| d.len() as u64),
                last_modified: Some(current.last_modified),
            }));
        }

        let start = match request.continuation_token.as_deref() {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| AppError::validation(format!("Invalid continuation token: {token}")))?,
            None => 0,
        };
        let limit = request
            .max_keys
            .map_or(self.page_size, |n| (n as usize).min(self.page_size))
            .max(1);
        let total = entries.len();
        let start = start.min(total);
        let end = (start + limit).min(total);

        let mut page = ObjectPage::default();
        for entry in entries.drain(start..end) {
            match entry {
                Entry::Folder(f) => page.folders.push(f),
                Entry::Object(o) => page.objects.push(o),
            }
        }
        if end < total {
            page.next_continuation_token = Some(end.to_string());
        }
        Ok(page)
    }

    async fn list_versions(
        &self,
        bucket: &str,
        request: &ListVersionsRequest,
    ) -> AppResult<VersionPage> {
        let mut state = self.lock();
        state.ops.push(StoreOp::ListVersions {
            bucket: bucket.to_string(),
        });
        state.check(StoreOperation::ListVersions, Some(bucket))?;
        let b = state.bucket(bucket)?;
        let prefix = request.prefix.as_deref().unwrap_or("");

        // Keys ascending, newest version first within a key.
        let all: Vec<(&String, &StoredVersion, bool)> = b
            .keys
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .flat_map(|(k, versions)| {
                let last = versions.len().saturating_sub(1);
                versions
                    .iter()
                    .enumerate()
                    .rev()
                    .map(move |(i, v)| (k, v, i == last))
            })
            .collect();

        let start = match (&request.key_marker, &request.version_id_marker) {
            (Some(key), Some(vid)) => all
                .iter()
                .position(|(k, v, _)| *k == key && v.version_id == *vid)
                .map_or(0, |i| i + 1),
            (Some(key), None) => all
                .iter()
                .position(|(k, _, _)| k.as_str() > key.as_str())
                .unwrap_or(all.len()),
            _ => 0,
        };
        let end = (start + self.page_size).min(all.len());

        let mut page = VersionPage::default();
        for (key, version, is_latest) in &all[start..end] {
            let entry = VersionEntry {
                key: (*key).clone(),
                version_id: version.version_id.clone(),
                is_latest: *is_latest,
                size: version.data.as_ref().map_or(0, |d| d.len() as u64),
                last_modified: Some(version.last_modified),
            };
            if version.data.is_some() {
                page.versions.push(entry);
            } else {
                page.delete_markers.push(entry);
            }
        }
        if end < all.len() {
            let (key, version, _) = all[end - 1];
            page.is_truncated = true;
            page.next_key_marker = Some(key.clone());
            page.next_version_id_marker = Some(version.version_id.clone());
        }
        Ok(page)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        _content_type: Option<&str>,
    ) -> AppResult<()> {
        let mut state = self.lock();
        state.ops.push(StoreOp::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size: body.len(),
        });
        state.check(StoreOperation::PutObject, Some(key))?;
        let versioned = state.bucket(bucket)?.versioned;
        let version_id = state.new_version_id(versioned);
        let b = state.bucket_mut(bucket)?;
        let versions = b.keys.entry(key.to_string()).or_default();
        if !versioned {
            versions.clear();
        }
        versions.push(StoredVersion {
            version_id,
            data: Some(body),
            last_modified: Utc::now(),
        });
        Ok(())
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> AppResult<Bytes> {
        let mut state = self.lock();
        state.ops.push(StoreOp::GetObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        state.check(StoreOperation::GetObject, Some(key))?;
        let b = state.bucket(bucket)?;
        let version = match version_id {
            Some(vid) => b
                .keys
                .get(key)
                .and_then(|versions| versions.iter().find(|v| v.version_id == vid)),
            None => b.current(key),
        };
        version
            .and_then(|v| v.data.clone())
            .ok_or_else(|| AppError::not_found(format!("NoSuchKey: {key}")))
    }

    async fn delete_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> AppResult<()> {
        let mut state = self.lock();
        state.ops.push(StoreOp::DeleteObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            version_id: version_id.map(str::to_string),
        });
        state.check(StoreOperation::DeleteObject, Some(key))?;
        state.delete_one(bucket, key, version_id)
    }

    async fn delete_objects(&self, bucket: &str, objects: &[ObjectIdentifier]) -> AppResult<()> {
        let mut state = self.lock();
        state.ops.push(StoreOp::DeleteObjects {
            bucket: bucket.to_string(),
            count: objects.len(),
        });
        state.check(StoreOperation::DeleteObjects, Some(bucket))?;
        if objects.len() > MAX_DELETE_BATCH {
            return Err(AppError::validation(format!(
                "Batch delete accepts at most {MAX_DELETE_BATCH} keys, got {}",
                objects.len()
            )));
        }
        state.bucket(bucket)?;
        for object in objects {
            state.delete_one(bucket, &object.key, object.version_id.as_deref())?;
        }
        Ok(())
    }

    async fn restore_version(&self, bucket: &str, key: &str, version_id: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.ops.push(StoreOp::RestoreVersion {
            bucket: bucket.to_string(),
            key: key.to_string(),
            version_id: version_id.to_string(),
        });
        state.check(StoreOperation::RestoreVersion, Some(key))?;
        let b = state.bucket(bucket)?;
        let data = b
            .keys
            .get(key)
            .and_then(|versions| versions.iter().find(|v| v.version_id == version_id))
            .and_then(|v| v.data.clone())
            .ok_or_else(|| AppError::not_found(format!("NoSuchVersion: {key}@{version_id}")))?;
        let versioned = b.versioned;
        let new_id = state.new_version_id(versioned);
        let versions = state.bucket_mut(bucket)?.keys.entry(key.to_string()).or_default();
        if !versioned {
            versions.clear();
        }
        versions.push(StoredVersion {
            version_id: new_id,
            data: Some(data),
            last_modified: Utc::now(),
        });
        Ok(())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
        expires_in_secs: u64,
    ) -> AppResult<String> {
        let mut state = self.lock();
        state.ops.push(StoreOp::PresignGet {
            bucket: bucket.to_string(),
            key: key.to_string(),
            expires_in_secs,
        });
        state.check(StoreOperation::PresignGet, Some(key))?;
        if expires_in_secs == 0 || expires_in_secs > MAX_PRESIGN_EXPIRY_SECS {
            return Err(AppError::validation(format!(
                "Presigned URL expiry must be between 1 and {MAX_PRESIGN_EXPIRY_SECS} seconds"
            )));
        }
        let mut url = format!(
            "memory://{bucket}/{}?X-Amz-Expires={expires_in_secs}",
            encode_key(key)
        );
        if let Some(vid) = version_id {
            url.push_str(&format!("&versionId={}", encode_key(vid)));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(keys: &[&str]) -> MemoryObjectStore {
        let store = MemoryObjectStore::new();
        store.create_bucket("b").await.unwrap();
        for key in keys {
            store
                .put_object("b", key, Bytes::from_static(b"data"), None)
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_delimited_listing_groups_folders() {
        let store = store_with(&["a/1.txt", "a/2.txt", "b/", "root.txt"]).await;
        let page = store
            .list_objects("b", &ListObjectsRequest::delimited(""))
            .await
            .unwrap();
        assert_eq!(page.folders, vec!["a/".to_string(), "b/".to_string()]);
        assert_eq!(page.objects.len(), 1);
        assert_eq!(page.objects[0].key, "root.txt");
        assert!(page.next_continuation_token.is_none());
    }

    #[tokio::test]
    async fn test_listing_pages_with_tokens() {
        let store = store_with(&["k1", "k2", "k3", "k4", "k5"]).await;
        let store = store.with_page_size(2);
        let mut token = None;
        let mut seen = Vec::new();
        loop {
            let page = store
                .list_objects("b", &ListObjectsRequest::recursive("").with_token(token))
                .await
                .unwrap();
            seen.extend(page.objects.into_iter().map(|o| o.key));
            token = page.next_continuation_token;
            if token.is_none() {
                break;
            }
        }
        assert_eq!(seen, vec!["k1", "k2", "k3", "k4", "k5"]);
    }

    #[tokio::test]
    async fn test_versioned_delete_leaves_marker() {
        let store = store_with(&[]).await;
        store.enable_versioning("b").await.unwrap();
        store
            .put_object("b", "f", Bytes::from_static(b"one"), None)
            .await
            .unwrap();
        store.delete_object("b", "f", None).await.unwrap();

        assert!(store.current_keys("b").is_empty());
        assert_eq!(store.version_count("b"), 2);
        let page = store
            .list_versions("b", &ListVersionsRequest::default())
            .await
            .unwrap();
        assert_eq!(page.versions.len(), 1);
        assert_eq!(page.delete_markers.len(), 1);
        assert!(page.delete_markers[0].is_latest);

        let err = store.delete_bucket("b").await.unwrap_err();
        assert_eq!(err.kind, bucketdock_core::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_version_pages_resume_from_markers() {
        let store = store_with(&[]).await.with_page_size(2);
        store.enable_versioning("b").await.unwrap();
        for _ in 0..3 {
            store
                .put_object("b", "f", Bytes::from_static(b"x"), None)
                .await
                .unwrap();
        }
        let first = store
            .list_versions("b", &ListVersionsRequest::default())
            .await
            .unwrap();
        assert!(first.is_truncated);
        let second = store
            .list_versions(
                "b",
                &ListVersionsRequest {
                    prefix: None,
                    key_marker: first.next_key_marker.clone(),
                    version_id_marker: first.next_version_id_marker.clone(),
                },
            )
            .await
            .unwrap();
        assert!(!second.is_truncated);
        assert_eq!(first.versions.len() + second.versions.len(), 3);
    }

    #[tokio::test]
    async fn test_restore_copies_old_version() {
        let store = store_with(&[]).await;
        store.enable_versioning("b").await.unwrap();
        store
            .put_object("b", "f", Bytes::from_static(b"old"), None)
            .await
            .unwrap();
        let old = store
            .list_versions("b", &ListVersionsRequest::default())
            .await
            .unwrap()
            .versions[0]
            .version_id
            .clone();
        store
            .put_object("b", "f", Bytes::from_static(b"new"), None)
            .await
            .unwrap();
        store.restore_version("b", "f", &old).await.unwrap();
        let body = store.get_object("b", "f", None).await.unwrap();
        assert_eq!(body.as_ref(), b"old");
        assert_eq!(store.version_count("b"), 3);
    }

    #[tokio::test]
    async fn test_batch_limit_and_injected_failure() {
        let store = store_with(&["x"]).await;
        let too_many: Vec<_> = (0..1001).map(|i| ObjectIdentifier::key(format!("k{i}"))).collect();
        assert!(store.delete_objects("b", &too_many).await.is_err());

        store.inject_failure(StoreOperation::PutObject, AppError::storage("boom"));
        assert!(
            store
                .put_object("b", "y", Bytes::new(), None)
                .await
                .is_err()
        );
        store.clear_failures();
        assert!(store.put_object("b", "y", Bytes::new(), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_presign_expiry_bounds() {
        let store = store_with(&["f"]).await;
        assert!(store.presign_get("b", "f", None, 604_800).await.is_ok());
        assert!(store.presign_get("b", "f", None, 604_801).await.is_err());
        assert!(store.presign_get("b", "f", None, 0).await.is_err());
    }
}
