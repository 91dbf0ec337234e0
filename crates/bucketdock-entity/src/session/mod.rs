//! Auth session entities.

pub mod model;

pub use model::AuthSession;
