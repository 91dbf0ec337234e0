//! Profile and user account entities.

pub mod account;
pub mod model;
pub mod role;

pub use account::{NewUserInvite, UserAccount};
pub use model::{Profile, UpdateProfile};
pub use role::UserRole;
