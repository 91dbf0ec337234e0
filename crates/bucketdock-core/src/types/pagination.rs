//! Pagination types for list endpoints.
//!
//! Bucket listings page by offset ranges against the metadata backend
//! (`from..=to` inclusive on the wire). Object listings page by opaque
//! continuation tokens and live with the object store types instead.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_PAGE_SIZE: u64 = 30;
/// Maximum page size.
const MAX_PAGE_SIZE: u64 = 1000;

/// Request parameters for offset-paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (0-based).
    #[serde(default)]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Index of the first row on this page.
    pub fn offset(&self) -> u64 {
        self.page * self.page_size
    }

    /// Number of rows on this page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Inclusive `(from, to)` range as used by `Range` headers.
    pub fn range(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + self.page_size - 1)
    }

    /// The request for the following page.
    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            page_size: self.page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Page number (0-based).
    pub page: u64,
    /// Number of items requested per page.
    pub page_size: u64,
    /// Whether another page may exist. True while pages come back full.
    pub has_more: bool,
}

impl<T> PageResponse<T> {
    /// Wrap the rows returned for `request`.
    pub fn new(items: Vec<T>, request: &PageRequest) -> Self {
        let has_more = items.len() as u64 == request.page_size;
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            has_more,
        }
    }

    /// Create an empty final page.
    pub fn empty(request: &PageRequest) -> Self {
        Self {
            items: Vec::new(),
            page: request.page,
            page_size: request.page_size,
            has_more: false,
        }
    }
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
