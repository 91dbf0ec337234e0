//! Storage quota accounting.

pub mod service;

pub use service::QuotaService;
