//! Version history of a single key.

use std::sync::Arc;

use tracing::info;

use bucketdock_core::config::share::ShareConfig;
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;
use bucketdock_core::traits::object_store::{ListVersionsRequest, VersionEntry};

use crate::feedback::{LoadingToast, Notifier};

/// Lists, restores, downloads and deletes object versions.
#[derive(Debug, Clone)]
pub struct VersionService {
    store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
    config: ShareConfig,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(store: Arc<dyn ObjectStore>, notifier: Arc<dyn Notifier>, config: ShareConfig) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Every version of exactly `key`, newest first. Delete markers are left out.
    pub async fn history(&self, bucket: &str, key: &str) -> AppResult<Vec<VersionEntry>> {
        let mut versions = Vec::new();
        let mut request = ListVersionsRequest {
            prefix: Some(key.to_string()),
            ..ListVersionsRequest::default()
        };
        loop {
            let page = self.store.list_versions(bucket, &request).await?;
            versions.extend(page.versions.into_iter().filter(|v| v.key == key));
            if !page.is_truncated {
                break;
            }
            request.key_marker = page.next_key_marker;
            request.version_id_marker = page.next_version_id_marker;
        }
        versions.sort_by(|a, b| {
            b.is_latest
                .cmp(&a.is_latest)
                .then(b.last_modified.cmp(&a.last_modified))
        });
        Ok(versions)
    }

    /// Make `version_id` the current version by copying it over `key`.
    pub async fn restore(&self, bucket: &str, key: &str, version_id: &str) -> AppResult<()> {
        let history = self.history(bucket, key).await?;
        let entry = history
            .iter()
            .find(|v| v.version_id == version_id)
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))?;
        if entry.is_latest {
            return Err(AppError::validation("This is already the current version"));
        }

        let toast = LoadingToast::start(&self.notifier, "Restoring version...");
        match self.store.restore_version(bucket, key, version_id).await {
            Ok(()) => {
                info!(bucket, key, version_id, "Version restored");
                toast.succeed("Version restored successfully.");
                Ok(())
            }
            Err(e) => Err(toast.fail("Failed to restore version", e)),
        }
    }

    /// Presigned download URL for one version.
    pub async fn download_url(&self, bucket: &str, key: &str, version_id: &str) -> AppResult<String> {
        self.store
            .presign_get(bucket, key, Some(version_id), self.config.presign_expiry_secs)
            .await
            .inspect_err(|e| {
                self.notifier
                    .error(&format!("Failed to generate download link: {}", e.message));
            })
    }

    /// Permanently delete one version.
    pub async fn delete(&self, bucket: &str, key: &str, version_id: &str) -> AppResult<()> {
        let toast = LoadingToast::start(&self.notifier, "Deleting version...");
        match self.store.delete_object(bucket, key, Some(version_id)).await {
            Ok(()) => {
                info!(bucket, key, version_id, "Version deleted");
                toast.succeed("Version permanently deleted.");
                Ok(())
            }
            Err(e) => Err(toast.fail("Failed to delete version", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::TracingNotifier;
    use bucketdock_storage::MemoryObjectStore;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_history_is_exact_key_newest_first() {
        let store = Arc::new(MemoryObjectStore::new());
        store.create_bucket("b").await.unwrap();
        store.enable_versioning("b").await.unwrap();
        for body in ["one", "two", "three"] {
            store.put_object("b", "a.txt", Bytes::from(body), None).await.unwrap();
        }
        store.put_object("b", "a.txt.bak", Bytes::from("x"), None).await.unwrap();

        let service = VersionService::new(
            store.clone(),
            Arc::new(TracingNotifier::new()),
            ShareConfig::default(),
        );
        let history = service.history("b", "a.txt").await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history[0].is_latest);
        assert_eq!(history[0].size, 5);

        let oldest = history[2].version_id.clone();
        service.restore("b", "a.txt", &oldest).await.unwrap();
        let body = store.get_object("b", "a.txt", None).await.unwrap();
        assert_eq!(body, Bytes::from("one"));

        let latest = service.history("b", "a.txt").await.unwrap()[0].version_id.clone();
        assert!(service.restore("b", "a.txt", &latest).await.is_err());
    }
}
