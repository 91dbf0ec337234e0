//! Sign-in, sign-up and session lifecycle.

pub mod service;

pub use service::AuthService;
