//! Name search across buckets.
//!
//! Bucket names match on a case-insensitive substring. Object keys match
//! on prefix only, since the object store offers nothing else.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use bucketdock_auth::RequestContext;
use bucketdock_backend::MetadataBackend;
use bucketdock_core::config::browse::BrowseConfig;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;
use bucketdock_core::traits::object_store::{ListObjectsRequest, ObjectPage};
use bucketdock_entity::bucket::Bucket;
use bucketdock_entity::object::key::{is_folder_key, parent_prefix};

/// A file whose key starts with the query. Folder placeholders never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Folder holding the object; empty at the bucket root.
    pub folder: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Search results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    /// The query searched for.
    pub query: String,
    /// Buckets whose name contains the query.
    pub buckets: Vec<Bucket>,
    /// Objects whose key starts with the query.
    pub objects: Vec<SearchHit>,
    /// Buckets that could not be searched.
    pub skipped: Vec<String>,
}

impl SearchResults {
    /// Note shown next to the results.
    pub const PREFIX_ONLY_NOTE: &'static str =
        "Object search matches the beginning of the object key only.";

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty() && self.objects.is_empty()
    }
}

/// Searches bucket names and object keys.
#[derive(Debug, Clone)]
pub struct SearchService {
    store: Arc<dyn ObjectStore>,
    backend: Arc<dyn MetadataBackend>,
    config: BrowseConfig,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        backend: Arc<dyn MetadataBackend>,
        config: BrowseConfig,
    ) -> Self {
        Self {
            store,
            backend,
            config,
        }
    }

    /// Search every bucket the caller can see.
    ///
    /// Buckets are listed concurrently. A bucket whose listing fails is
    /// logged and skipped.
    pub async fn search(&self, ctx: &RequestContext, query: &str) -> AppResult<SearchResults> {
        let query = query.trim();
        let mut results = SearchResults {
            query: query.to_string(),
            ..SearchResults::default()
        };
        if query.is_empty() || !ctx.is_authenticated() {
            return Ok(results);
        }

        let buckets = self.backend.list_all_buckets().await?;
        let needle = query.to_lowercase();
        results.buckets = buckets
            .iter()
            .filter(|b| b.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let request =
            ListObjectsRequest::recursive(query).with_max_keys(self.config.search_results_per_bucket);
        let listings = join_all(
            buckets
                .iter()
                .map(|b| self.store.list_objects(&b.name, &request)),
        )
        .await;

        for (bucket, listing) in buckets.iter().zip(listings) {
            match listing {
                Ok(ObjectPage { objects, .. }) => {
                    results.objects.extend(
                        objects
                            .into_iter()
                            .filter(|o| o.key != query && !is_folder_key(&o.key))
                            .map(|o| SearchHit {
                                bucket: bucket.name.clone(),
                                folder: parent_prefix(&o.key).to_string(),
                                key: o.key,
                                size: o.size,
                                last_modified: o.last_modified,
                            }),
                    );
                }
                Err(e) => {
                    warn!(bucket = %bucket.name, error = %e, "Skipping bucket in search");
                    results.skipped.push(bucket.name.clone());
                }
            }
        }
        Ok(results)
    }
}
