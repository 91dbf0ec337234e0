//! Browsing and mutating objects inside a bucket.

pub mod browse;
pub mod delete;
pub mod preview;
pub mod upload;
pub mod version;

pub use browse::{BrowseService, FolderTree, ObjectFeed, ObjectListing};
pub use delete::{DeleteOutcome, DeleteService, SelectionItem};
pub use preview::{Preview, PreviewKind, PreviewService};
pub use upload::{UploadFile, UploadReport, UploadService};
pub use version::VersionService;
