//! # bucketdock-storage
//!
//! Object store implementations for BucketDock: an S3-compatible client
//! built on `aws-sdk-s3`, and an in-memory store used by tests and
//! offline runs.

pub mod providers;

use std::sync::Arc;

use bucketdock_core::config::storage::StorageConfig;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;

pub use providers::MemoryObjectStore;
#[cfg(feature = "s3")]
pub use providers::S3ObjectStore;

/// Build the configured object store.
///
/// Fails with a `Configuration` error when the endpoint or credentials
/// are missing.
#[cfg(feature = "s3")]
pub async fn connect(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store = S3ObjectStore::new(config).await?;
    Ok(Arc::new(store))
}

/// Build the configured object store.
#[cfg(not(feature = "s3"))]
pub async fn connect(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    config.validate()?;
    Err(bucketdock_core::AppError::configuration(
        "S3 support is not compiled in (enable the `s3` feature)",
    ))
}
