//! # bucketdock-core
//!
//! Core crate for BucketDock. Contains the object-store trait and its
//! wire-neutral types, configuration schemas, typed identifiers,
//! pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other BucketDock crates.

pub mod config;
pub mod error;
pub mod limits;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorCategory, ErrorKind};
pub use result::AppResult;
