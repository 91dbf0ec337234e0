//! Object store connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// S3-compatible object store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// Region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (`{endpoint}/{bucket}/{key}`).
    #[serde(default = "default_true")]
    pub force_path_style: bool,
}

impl StorageConfig {
    /// Check that endpoint and credentials are present.
    pub fn validate(&self) -> Result<(), AppError> {
        let missing: Vec<&str> = [
            ("endpoint", &self.endpoint),
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::configuration(format!(
                "Object storage is not configured (missing storage.{})",
                missing.join(", storage.")
            )))
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: true,
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}
