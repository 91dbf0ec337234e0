//! Listing and search configuration.

use serde::{Deserialize, Serialize};

/// Paging behaviour for bucket and object feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Rows per bucket page.
    #[serde(default = "default_buckets_per_page")]
    pub buckets_per_page: u64,
    /// Keys per object page.
    #[serde(default = "default_objects_per_page")]
    pub objects_per_page: u32,
    /// Load the next page when the viewport is this close to the end.
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: usize,
    /// Upper bound on keys returned per bucket by search.
    #[serde(default = "default_search_results")]
    pub search_results_per_bucket: u32,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            buckets_per_page: default_buckets_per_page(),
            objects_per_page: default_objects_per_page(),
            prefetch_threshold: default_prefetch_threshold(),
            search_results_per_bucket: default_search_results(),
        }
    }
}

fn default_buckets_per_page() -> u64 {
    30
}

fn default_objects_per_page() -> u32 {
    1000
}

fn default_prefetch_threshold() -> usize {
    5
}

fn default_search_results() -> u32 {
    1000
}
