//! # bucketdock-service
//!
//! Orchestration layer for BucketDock. Each service combines the object
//! store, the metadata backend and the client-side auth state to implement
//! one user-facing use case: bucket lifecycle, browsing, deletion, uploads,
//! previews, share links, version history, access control, quota
//! accounting, search, administration and the auth flows.
//!
//! Services follow constructor injection: every dependency is handed over
//! as an `Arc` at construction time. Mutations report progress through a
//! [`Notifier`](feedback::Notifier).

pub mod access;
pub mod admin;
pub mod auth;
pub mod bucket;
pub mod feedback;
pub mod object;
pub mod quota;
pub mod search;
pub mod share;

pub use access::{AccessService, InviteReport, parse_invite_emails};
pub use admin::{AdminService, SpaceRequestService};
pub use auth::AuthService;
pub use bucket::{BucketFeed, BucketService, validate_bucket_name};
pub use feedback::{ActionState, LoadingToast, Notifier, ToastId, TracingNotifier};
pub use object::{
    BrowseService, DeleteOutcome, DeleteService, FolderTree, ObjectFeed, PreviewService,
    UploadFile, UploadService, VersionService,
};
pub use quota::QuotaService;
pub use search::{SearchResults, SearchService};
pub use share::{ExpiryDuration, ShareLink, ShareService};
