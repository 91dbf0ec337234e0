//! Bucket domain entities.

pub mod level;
pub mod model;

pub use level::PublicLevel;
pub use model::{Bucket, CreateBucket};
