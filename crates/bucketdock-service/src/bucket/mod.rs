//! Bucket lifecycle and the bucket feed.

pub mod feed;
pub mod name;
pub mod service;

pub use feed::BucketFeed;
pub use name::validate_bucket_name;
pub use service::{BucketService, DrainReport};
