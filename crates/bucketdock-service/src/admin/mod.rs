//! User administration and space requests.

pub mod space;
pub mod users;

pub use space::SpaceRequestService;
pub use users::AdminService;
