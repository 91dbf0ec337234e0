//! # bucketdock-backend
//!
//! Clients for the hosted metadata/auth backend: PostgREST tables, remote
//! procedures, serverless functions and the auth service. Row-level
//! security is enforced server-side; this crate only forwards the caller's
//! session token.

pub mod memory;
pub mod rest;
pub mod traits;

pub use memory::MemoryBackend;
pub use rest::RestBackend;
pub use traits::{AuthProvider, MetadataBackend};
