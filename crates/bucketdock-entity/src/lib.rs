//! # bucketdock-entity
//!
//! Domain entity models for BucketDock. Every struct in this crate
//! represents a backend table row, a remote-procedure result, or a domain
//! value object. All entities derive `Debug`, `Clone`, `Serialize` and
//! `Deserialize` with the field names the backend uses on the wire.

pub mod bucket;
pub mod member;
pub mod object;
pub mod profile;
pub mod session;
pub mod space_request;
pub mod storage;
