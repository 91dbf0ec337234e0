//! Object, folder and selection deletion with quota accounting.
//!
//! Keys are removed in sequential batches of at most
//! [`MAX_DELETE_BATCH`]; the first failed batch stops the rest. The
//! quota is decremented once, after every batch has succeeded.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use bucketdock_auth::RequestContext;
use bucketdock_core::limits::MAX_DELETE_BATCH;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;
use bucketdock_core::traits::object_store::{ListObjectsRequest, ObjectIdentifier};

use crate::feedback::{LoadingToast, Notifier};
use crate::quota::QuotaService;

/// One entry of a multi-select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionItem {
    /// A file with its known size.
    File {
        /// Object key.
        key: String,
        /// Size in bytes.
        size: u64,
    },
    /// A folder prefix, expanded to every key below it.
    Folder {
        /// Prefix ending in `/`.
        prefix: String,
    },
}

/// Result of a successful deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Keys deleted.
    pub deleted: usize,
    /// Bytes freed.
    pub bytes: u64,
    /// Batch-delete calls issued.
    pub batches: usize,
    /// Whether the quota counter was updated.
    pub quota_synced: bool,
}

/// Deletes objects and keeps the quota in step.
#[derive(Debug, Clone)]
pub struct DeleteService {
    store: Arc<dyn ObjectStore>,
    quota: QuotaService,
    notifier: Arc<dyn Notifier>,
}

impl DeleteService {
    /// Creates a new delete service.
    pub fn new(store: Arc<dyn ObjectStore>, quota: QuotaService, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            quota,
            notifier,
        }
    }

    /// Delete one object of known size.
    pub async fn delete_object(
        &self,
        ctx: &RequestContext,
        bucket: &str,
        key: &str,
        size: u64,
    ) -> AppResult<DeleteOutcome> {
        let toast = LoadingToast::start(&self.notifier, "Deleting file...");
        if let Err(e) = self.store.delete_object(bucket, key, None).await {
            return Err(toast.fail("Failed to delete file", e));
        }
        toast.finish();
        info!(bucket, key, size, "Object deleted");

        let outcome = DeleteOutcome {
            deleted: 1,
            bytes: size,
            batches: 0,
            quota_synced: false,
        };
        Ok(self.settle(ctx, outcome, "File deleted successfully.").await)
    }

    /// Delete every key under `prefix`.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        bucket: &str,
        prefix: &str,
    ) -> AppResult<DeleteOutcome> {
        let toast = LoadingToast::start(&self.notifier, "Deleting folder...");
        let (keys, bytes) = match self.collect(bucket, prefix).await {
            Ok(found) => found,
            Err(e) => return Err(toast.fail("Failed to delete folder", e)),
        };
        self.delete_keys(ctx, bucket, keys, bytes, toast, "Folder deleted successfully.")
            .await
    }

    /// Delete a mixed selection of files and folders as one operation.
    pub async fn delete_selection(
        &self,
        ctx: &RequestContext,
        bucket: &str,
        items: &[SelectionItem],
    ) -> AppResult<DeleteOutcome> {
        let toast = LoadingToast::start(
            &self.notifier,
            &format!("Deleting {} items...", items.len()),
        );
        let mut keys = Vec::new();
        let mut bytes = 0;
        for item in items {
            match item {
                SelectionItem::File { key, size } => {
                    keys.push(key.clone());
                    bytes += size;
                }
                SelectionItem::Folder { prefix } => match self.collect(bucket, prefix).await {
                    Ok((found, size)) => {
                        keys.extend(found);
                        bytes += size;
                    }
                    Err(e) => return Err(toast.fail("Failed to delete selection", e)),
                },
            }
        }
        self.delete_keys(ctx, bucket, keys, bytes, toast, "Selected items deleted successfully.")
            .await
    }

    /// Every key under `prefix` and their total size.
    async fn collect(&self, bucket: &str, prefix: &str) -> AppResult<(Vec<String>, u64)> {
        let mut keys = Vec::new();
        let mut bytes = 0;
        let mut token = None;
        loop {
            let request = ListObjectsRequest::recursive(prefix).with_token(token);
            let page = self.store.list_objects(bucket, &request).await?;
            for object in page.objects {
                bytes += object.size;
                keys.push(object.key);
            }
            match page.next_continuation_token {
                Some(next) => token = Some(next),
                None => return Ok((keys, bytes)),
            }
        }
    }

    async fn delete_keys(
        &self,
        ctx: &RequestContext,
        bucket: &str,
        keys: Vec<String>,
        bytes: u64,
        toast: LoadingToast,
        success: &str,
    ) -> AppResult<DeleteOutcome> {
        let mut outcome = DeleteOutcome {
            bytes,
            ..DeleteOutcome::default()
        };
        if keys.is_empty() {
            outcome.quota_synced = true;
            toast.succeed(success);
            return Ok(outcome);
        }

        let ids: Vec<ObjectIdentifier> = keys.into_iter().map(ObjectIdentifier::key).collect();
        for chunk in ids.chunks(MAX_DELETE_BATCH) {
            if let Err(e) = self.store.delete_objects(bucket, chunk).await {
                return Err(toast.fail("Failed to delete objects", e));
            }
            outcome.batches += 1;
            outcome.deleted += chunk.len();
        }
        toast.finish();
        info!(bucket, deleted = outcome.deleted, bytes, "Objects deleted");

        Ok(self.settle(ctx, outcome, success).await)
    }

    /// Decrement the quota and report the final toast.
    async fn settle(
        &self,
        ctx: &RequestContext,
        mut outcome: DeleteOutcome,
        success: &str,
    ) -> DeleteOutcome {
        let delta = -i64::try_from(outcome.bytes).unwrap_or(i64::MAX);
        match self.quota.adjust(ctx, delta).await {
            Ok(()) => {
                outcome.quota_synced = true;
                self.notifier.success(success);
            }
            Err(e) => {
                self.notifier.error(&format!(
                    "Deleted, but failed to update space usage: {}",
                    e.message
                ));
            }
        }
        outcome
    }
}
