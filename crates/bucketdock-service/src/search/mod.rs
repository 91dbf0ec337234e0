//! Bucket and object search.

pub mod service;

pub use service::{SearchHit, SearchResults, SearchService};
