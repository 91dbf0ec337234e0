//! S3-compatible object store provider.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTime as AwsDateTime};
use aws_sdk_s3::types::{
    BucketVersioningStatus, Delete, ObjectIdentifier as S3ObjectIdentifier,
    VersioningConfiguration,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};

use bucketdock_core::config::storage::StorageConfig;
use bucketdock_core::error::AppError;
use bucketdock_core::limits::{MAX_DELETE_BATCH, MAX_PRESIGN_EXPIRY_SECS};
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::object_store::{
    BucketSummary, ListObjectsRequest, ListVersionsRequest, ObjectIdentifier, ObjectMeta,
    ObjectPage, ObjectStore, VersionEntry, VersionPage,
};

use super::encode_key;

/// S3-compatible object store.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    endpoint: String,
}

impl S3ObjectStore {
    /// Create a client from configuration.
    ///
    /// SDK retries are disabled; every call is attempted exactly once.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        config.validate()?;
        tracing::info!(
            endpoint = %config.endpoint,
            region = %config.region,
            force_path_style = config.force_path_style,
            "Initializing S3 object store"
        );

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "bucketdock",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            endpoint: config.endpoint.clone(),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Map an SDK error to an [`AppError`], keeping the full error context.
fn map_sdk_error<E>(operation: &str, err: SdkError<E, HttpResponse>) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let context = DisplayErrorContext(&err).to_string();
    match status {
        Some(404) => AppError::not_found(format!("{operation}: {context}")),
        Some(409) => AppError::conflict(format!("{operation}: {context}")),
        Some(401) | Some(403) => AppError::authorization(format!("{operation}: {context}")),
        None if matches!(err, SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)) => {
            AppError::external_service(format!("{operation}: {context}"))
        }
        _ => AppError::storage(format!("{operation}: {context}")),
    }
}

fn to_chrono(dt: Option<&AwsDateTime>) -> Option<DateTime<Utc>> {
    dt.and_then(|d| DateTime::from_timestamp(d.secs(), d.subsec_nanos()))
}

fn size_of(size: Option<i64>) -> u64 {
    size.unwrap_or(0).max(0) as u64
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn list_buckets(&self) -> AppResult<Vec<BucketSummary>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| map_sdk_error("ListBuckets", e))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| {
                b.name().map(|name| BucketSummary {
                    name: name.to_string(),
                    created_at: to_chrono(b.creation_date()),
                })
            })
            .collect())
    }

    async fn create_bucket(&self, bucket: &str) -> AppResult<()> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error("CreateBucket", e))?;
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> AppResult<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error("DeleteBucket", e))?;
        Ok(())
    }

    async fn enable_versioning(&self, bucket: &str) -> AppResult<()> {
        let configuration = VersioningConfiguration::builder()
            .status(BucketVersioningStatus::Enabled)
            .build();
        self.client
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(configuration)
            .send()
            .await
            .map_err(|e| map_sdk_error("PutBucketVersioning", e))?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        request: &ListObjectsRequest,
    ) -> AppResult<ObjectPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(&request.prefix)
            .set_delimiter(request.delimiter.clone())
            .set_continuation_token(request.continuation_token.clone())
            .set_max_keys(request.max_keys.map(|n| n.min(i32::MAX as u32) as i32))
            .send()
            .await
            .map_err(|e| map_sdk_error("ListObjectsV2", e))?;

        let folders = output
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_string))
            .collect();
        let objects = output
            .contents()
            .iter()
            .filter_map(|o| {
                o.key().map(|key| ObjectMeta {
                    key: key.to_string(),
                    size: size_of(o.size()),
                    last_modified: to_chrono(o.last_modified()),
                })
            })
            .collect();
        let next_continuation_token = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ObjectPage {
            folders,
            objects,
            next_continuation_token,
        })
    }

    async fn list_versions(
        &self,
        bucket: &str,
        request: &ListVersionsRequest,
    ) -> AppResult<VersionPage> {
        let output = self
            .client
            .list_object_versions()
            .bucket(bucket)
            .set_prefix(request.prefix.clone())
            .set_key_marker(request.key_marker.clone())
            .set_version_id_marker(request.version_id_marker.clone())
            .send()
            .await
            .map_err(|e| map_sdk_error("ListObjectVersions", e))?;

        let versions = output
            .versions()
            .iter()
            .filter_map(|v| {
                let key = v.key()?;
                Some(VersionEntry {
                    key: key.to_string(),
                    version_id: v.version_id().unwrap_or("null").to_string(),
                    is_latest: v.is_latest().unwrap_or(false),
                    size: size_of(v.size()),
                    last_modified: to_chrono(v.last_modified()),
                })
            })
            .collect();
        let delete_markers = output
            .delete_markers()
            .iter()
            .filter_map(|m| {
                let key = m.key()?;
                Some(VersionEntry {
                    key: key.to_string(),
                    version_id: m.version_id().unwrap_or("null").to_string(),
                    is_latest: m.is_latest().unwrap_or(false),
                    size: 0,
                    last_modified: to_chrono(m.last_modified()),
                })
            })
            .collect();

        Ok(VersionPage {
            versions,
            delete_markers,
            is_truncated: output.is_truncated().unwrap_or(false),
            next_key_marker: output.next_key_marker().map(str::to_string),
            next_version_id_marker: output.next_version_id_marker().map(str::to_string),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> AppResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| map_sdk_error("PutObject", e))?;
        Ok(())
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> AppResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .set_version_id(version_id.map(str::to_string))
            .send()
            .await
            .map_err(|e| map_sdk_error("GetObject", e))?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::storage(format!("GetObject: failed to read body: {e}")))?;
        Ok(data.into_bytes())
    }

    async fn delete_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .set_version_id(version_id.map(str::to_string))
            .send()
            .await
            .map_err(|e| map_sdk_error("DeleteObject", e))?;
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, objects: &[ObjectIdentifier]) -> AppResult<()> {
        if objects.is_empty() {
            return Ok(());
        }
        if objects.len() > MAX_DELETE_BATCH {
            return Err(AppError::validation(format!(
                "Batch delete accepts at most {MAX_DELETE_BATCH} keys, got {}",
                objects.len()
            )));
        }

        let identifiers = objects
            .iter()
            .map(|o| {
                S3ObjectIdentifier::builder()
                    .key(&o.key)
                    .set_version_id(o.version_id.clone())
                    .build()
                    .map_err(|e| AppError::internal(format!("Invalid object identifier: {e}")))
            })
            .collect::<AppResult<Vec<_>>>()?;
        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .quiet(true)
            .build()
            .map_err(|e| AppError::internal(format!("Invalid delete request: {e}")))?;

        let output = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| map_sdk_error("DeleteObjects", e))?;

        if let Some(first) = output.errors().first() {
            return Err(AppError::storage(format!(
                "DeleteObjects: {} of {} keys failed, first '{}': {} {}",
                output.errors().len(),
                objects.len(),
                first.key().unwrap_or_default(),
                first.code().unwrap_or_default(),
                first.message().unwrap_or_default()
            )));
        }
        Ok(())
    }

    async fn restore_version(&self, bucket: &str, key: &str, version_id: &str) -> AppResult<()> {
        let copy_source = format!(
            "{bucket}/{}?versionId={}",
            encode_key(key),
            encode_key(version_id)
        );
        self.client
            .copy_object()
            .bucket(bucket)
            .key(key)
            .copy_source(copy_source)
            .send()
            .await
            .map_err(|e| map_sdk_error("CopyObject", e))?;
        Ok(())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
        expires_in_secs: u64,
    ) -> AppResult<String> {
        if expires_in_secs == 0 || expires_in_secs > MAX_PRESIGN_EXPIRY_SECS {
            return Err(AppError::validation(format!(
                "Presigned URL expiry must be between 1 and {MAX_PRESIGN_EXPIRY_SECS} seconds"
            )));
        }
        let presigning = PresigningConfig::expires_in(Duration::from_secs(expires_in_secs))
            .map_err(|e| AppError::validation(format!("Invalid presign expiry: {e}")))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .set_version_id(version_id.map(str::to_string))
            .presigned(presigning)
            .await
            .map_err(|e| map_sdk_error("PresignGetObject", e))?;
        Ok(request.uri().to_string())
    }
}
