//! Hard limits imposed by the object-store API.

/// Maximum number of keys accepted by a single batch-delete request.
pub const MAX_DELETE_BATCH: usize = 1000;

/// Longest expiry a presigned URL may carry (7 days, in seconds).
pub const MAX_PRESIGN_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;
