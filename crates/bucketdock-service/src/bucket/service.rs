//! Bucket creation, deletion and visibility.
//!
//! A bucket exists twice: in the object store and as a metadata row. The
//! two are created and removed by separate calls with no transaction
//! spanning them.

use std::sync::Arc;

use tracing::{info, warn};

use bucketdock_auth::{RequestContext, require_user};
use bucketdock_backend::MetadataBackend;
use bucketdock_core::error::AppError;
use bucketdock_core::limits::MAX_DELETE_BATCH;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;
use bucketdock_core::traits::object_store::{ListVersionsRequest, ObjectIdentifier};
use bucketdock_core::types::{PageRequest, PageResponse};
use bucketdock_entity::bucket::{Bucket, CreateBucket, PublicLevel};

use super::name::validate_bucket_name;
use crate::feedback::{LoadingToast, Notifier};

/// What was removed while emptying a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Object versions and delete markers removed.
    pub removed: usize,
    /// Batch-delete calls issued.
    pub batches: usize,
}

/// Bucket lifecycle.
#[derive(Debug, Clone)]
pub struct BucketService {
    store: Arc<dyn ObjectStore>,
    backend: Arc<dyn MetadataBackend>,
    notifier: Arc<dyn Notifier>,
}

impl BucketService {
    /// Creates a new bucket service.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        backend: Arc<dyn MetadataBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            backend,
            notifier,
        }
    }

    /// One page of the caller's buckets.
    pub async fn page(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<Bucket>> {
        require_user(ctx)?;
        let rows = self.backend.list_buckets(&page).await?;
        Ok(PageResponse::new(rows, &page))
    }

    /// Every bucket visible to the caller, by name.
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Bucket>> {
        require_user(ctx)?;
        self.backend.list_all_buckets().await
    }

    /// Look up a bucket row by name.
    pub async fn find(&self, name: &str) -> AppResult<Bucket> {
        self.backend
            .find_bucket(name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Bucket '{name}' not found")))
    }

    /// Create a versioned bucket owned by the caller.
    ///
    /// If any step after the store bucket exists fails, the store bucket is
    /// deleted again and the original error is returned.
    pub async fn create(&self, ctx: &RequestContext, name: &str) -> AppResult<Bucket> {
        let owner = require_user(ctx)?;
        validate_bucket_name(name)?;

        let toast = LoadingToast::start(&self.notifier, &format!("Creating bucket '{name}'..."));
        if let Err(e) = self.store.create_bucket(name).await {
            return Err(toast.fail("Failed to create bucket", e));
        }

        let row = CreateBucket {
            name: name.to_string(),
            owner_id: owner,
            public_level: PublicLevel::Private,
        };
        let result = match self.store.enable_versioning(name).await {
            Ok(()) => self.backend.insert_bucket(&row).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(bucket) => {
                info!(bucket = name, owner_id = %owner, "Bucket created");
                toast.succeed(&format!("Bucket '{name}' created successfully."));
                Ok(bucket)
            }
            Err(e) => {
                if let Err(cleanup) = self.store.delete_bucket(name).await {
                    warn!(bucket = name, error = %cleanup, "Compensating bucket delete failed");
                }
                Err(toast.fail("Failed to create bucket", e))
            }
        }
    }

    /// Delete a bucket and everything in it.
    ///
    /// Stages run in order and the first failure stops the rest: drain
    /// every version and delete marker, delete the empty store bucket,
    /// delete the metadata row.
    pub async fn delete(&self, ctx: &RequestContext, bucket: &Bucket) -> AppResult<DrainReport> {
        let user = require_user(ctx)?;
        if !bucket.is_owned_by(&user) {
            return Err(AppError::authorization(
                "Only the bucket owner can delete a bucket",
            ));
        }

        let mut toast = LoadingToast::start(
            &self.notifier,
            &format!("Emptying bucket '{}'...", bucket.name),
        );
        let report = match self.drain(&bucket.name).await {
            Ok(report) => report,
            Err(e) => return Err(toast.fail("Failed to empty bucket", e)),
        };

        toast.stage(&format!("Deleting bucket '{}'...", bucket.name));
        if let Err(e) = self.store.delete_bucket(&bucket.name).await {
            return Err(toast.fail("Failed to delete bucket", e));
        }

        toast.stage("Removing bucket record...");
        if let Err(e) = self.backend.delete_bucket(bucket.id).await {
            return Err(toast.fail("Failed to remove bucket record", e));
        }

        info!(
            bucket = %bucket.name,
            removed = report.removed,
            batches = report.batches,
            "Bucket deleted"
        );
        toast.succeed(&format!("Bucket '{}' deleted successfully.", bucket.name));
        Ok(report)
    }

    /// Delete every object version and delete marker in `bucket`.
    pub async fn drain(&self, bucket: &str) -> AppResult<DrainReport> {
        let mut report = DrainReport::default();
        let mut request = ListVersionsRequest::default();
        loop {
            let page = self.store.list_versions(bucket, &request).await?;
            let ids: Vec<ObjectIdentifier> = page
                .versions
                .iter()
                .chain(page.delete_markers.iter())
                .map(|v| ObjectIdentifier::version(&v.key, &v.version_id))
                .collect();

            for chunk in ids.chunks(MAX_DELETE_BATCH) {
                self.store.delete_objects(bucket, chunk).await?;
                report.batches += 1;
                report.removed += chunk.len();
            }

            if !page.is_truncated {
                return Ok(report);
            }
            request.key_marker = page.next_key_marker;
            request.version_id_marker = page.next_version_id_marker;
        }
    }

    /// Change who can see and write a bucket without signing in.
    pub async fn set_visibility(
        &self,
        ctx: &RequestContext,
        bucket: &Bucket,
        level: PublicLevel,
    ) -> AppResult<()> {
        let user = require_user(ctx)?;
        if !bucket.is_owned_by(&user) {
            return Err(AppError::authorization(
                "Only the bucket owner can change visibility",
            ));
        }
        match self.backend.update_bucket_level(bucket.id, level).await {
            Ok(()) => {
                info!(bucket = %bucket.name, level = %level, "Bucket visibility changed");
                self.notifier
                    .success(&format!("Bucket '{}' is now {level}.", bucket.name));
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to update visibility: {}", e.message));
                Err(e)
            }
        }
    }
}
