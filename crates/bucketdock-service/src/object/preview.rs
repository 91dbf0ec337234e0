//! Previews and downloads via presigned URLs.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

use bucketdock_core::config::share::ShareConfig;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;

/// Extensions rendered inline as images.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// How a preview is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    /// Rendered inline.
    Image,
    /// Offered as a download.
    Download,
}

impl PreviewKind {
    /// Classify a key by its extension.
    pub fn for_key(key: &str) -> Self {
        let ext = key
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Image
        } else {
            Self::Download
        }
    }
}

/// A presigned preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    /// Object key.
    pub key: String,
    /// Presigned GET URL.
    pub url: String,
    /// Display mode.
    pub kind: PreviewKind,
}

/// Generates preview and download URLs.
#[derive(Debug, Clone)]
pub struct PreviewService {
    store: Arc<dyn ObjectStore>,
    config: ShareConfig,
}

impl PreviewService {
    /// Creates a new preview service.
    pub fn new(store: Arc<dyn ObjectStore>, config: ShareConfig) -> Self {
        Self { store, config }
    }

    /// Presigned preview of the current version of `key`.
    pub async fn preview(&self, bucket: &str, key: &str) -> AppResult<Preview> {
        let url = self.download_url(bucket, key, None).await?;
        Ok(Preview {
            key: key.to_string(),
            url,
            kind: PreviewKind::for_key(key),
        })
    }

    /// Presigned download URL, optionally for a specific version.
    pub async fn download_url(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> AppResult<String> {
        self.store
            .presign_get(bucket, key, version_id, self.config.presign_expiry_secs)
            .await
    }

    /// Object bytes, optionally for a specific version.
    pub async fn fetch(&self, bucket: &str, key: &str, version_id: Option<&str>) -> AppResult<Bytes> {
        self.store.get_object(bucket, key, version_id).await
    }
}
