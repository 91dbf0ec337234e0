//! Uploads and folder creation.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use bucketdock_auth::RequestContext;
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;
use bucketdock_entity::object::format_bytes;

use crate::feedback::{LoadingToast, Notifier};
use crate::quota::QuotaService;

/// Fallback content type.
const OCTET_STREAM: &str = "application/octet-stream";

/// A file to upload, addressed relative to the target folder.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Path below the target prefix, e.g. `photos/cat.png` for a folder upload.
    pub relative_path: String,
    /// File contents.
    pub body: Bytes,
}

impl UploadFile {
    /// A file named `relative_path` with `body`.
    pub fn new(relative_path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            relative_path: relative_path.into(),
            body: body.into(),
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }

    /// Content type guessed from the file extension.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.relative_path)
            .first_raw()
            .unwrap_or(OCTET_STREAM)
            .to_string()
    }
}

/// Result of an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    /// Keys written.
    pub keys: Vec<String>,
    /// Total bytes written.
    pub bytes: u64,
    /// Whether the quota counter was updated.
    pub quota_synced: bool,
}

/// Writes objects into a bucket.
#[derive(Debug, Clone)]
pub struct UploadService {
    store: Arc<dyn ObjectStore>,
    quota: QuotaService,
    notifier: Arc<dyn Notifier>,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(store: Arc<dyn ObjectStore>, quota: QuotaService, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            quota,
            notifier,
        }
    }

    /// Upload `files` below `prefix`, one after another.
    ///
    /// Refused up front when the signed-in caller's quota cannot hold the
    /// batch. A failed put stops the upload; files already written stay
    /// and are not counted against the quota.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        bucket: &str,
        prefix: &str,
        files: &[UploadFile],
    ) -> AppResult<UploadReport> {
        if files.is_empty() {
            return Err(AppError::validation("No files selected"));
        }
        let total: u64 = files.iter().map(UploadFile::size).sum();
        let total_signed = i64::try_from(total).unwrap_or(i64::MAX);
        if ctx.is_authenticated()
            && let Some(quota) = self.quota.cached()
            && quota.would_exceed(total_signed)
        {
            let message = format!(
                "Not enough storage space: {} needed, {} available",
                format_bytes(total_signed),
                format_bytes(quota.available_bytes.unwrap_or(0))
            );
            self.notifier.error(&message);
            return Err(AppError::validation(message));
        }

        let mut toast = LoadingToast::start(
            &self.notifier,
            &format!("Uploading {} file(s)...", files.len()),
        );
        let mut report = UploadReport::default();
        for (i, file) in files.iter().enumerate() {
            if files.len() > 1 {
                toast.stage(&format!(
                    "Uploading {} ({}/{})...",
                    file.relative_path,
                    i + 1,
                    files.len()
                ));
            }
            let key = format!("{prefix}{}", file.relative_path.trim_start_matches('/'));
            let content_type = file.content_type();
            if let Err(e) = self
                .store
                .put_object(bucket, &key, file.body.clone(), Some(&content_type))
                .await
            {
                return Err(toast.fail(&format!("Failed to upload {}", file.relative_path), e));
            }
            report.keys.push(key);
            report.bytes += file.size();
        }
        toast.finish();
        info!(bucket, prefix, files = report.keys.len(), bytes = report.bytes, "Upload complete");

        match self.quota.adjust(ctx, total_signed).await {
            Ok(()) => {
                report.quota_synced = true;
                self.notifier
                    .success(&format!("{} file(s) uploaded successfully.", report.keys.len()));
            }
            Err(e) => self.notifier.error(&format!(
                "Uploaded, but failed to update space usage: {}",
                e.message
            )),
        }
        Ok(report)
    }

    /// Create an empty folder named `name` under `prefix`. Returns its prefix.
    pub async fn create_folder(&self, bucket: &str, prefix: &str, name: &str) -> AppResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if name.contains('/') {
            return Err(AppError::validation("Folder name cannot contain '/'"));
        }
        let folder = format!("{prefix}{name}/");
        match self.store.put_object(bucket, &folder, Bytes::new(), None).await {
            Ok(()) => {
                info!(bucket, folder = %folder, "Folder created");
                self.notifier
                    .success(&format!("Folder '{name}' created successfully."));
                Ok(folder)
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to create folder: {}", e.message));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_guess() {
        assert_eq!(UploadFile::new("a/cat.png", "x").content_type(), "image/png");
        assert_eq!(UploadFile::new("notes", "x").content_type(), OCTET_STREAM);
    }
}
