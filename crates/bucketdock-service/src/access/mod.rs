//! Bucket membership and invitations.

pub mod invite;
pub mod service;

pub use invite::{InviteList, parse_invite_emails};
pub use service::{AccessService, InviteOutcome, InviteReport};
