//! Storage space request entities.

pub mod model;
pub mod status;

pub use model::{CreateSpaceRequest, SpaceRequest, SpaceUnit};
pub use status::SpaceRequestStatus;
