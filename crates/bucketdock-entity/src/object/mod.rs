//! Object key helpers.
//!
//! Folders are a naming convention: a key ending in `/` (zero-byte
//! placeholder or common prefix). Nothing here talks to the store.

pub mod key;

pub use key::{Breadcrumb, breadcrumbs, display_name, format_bytes, is_folder_key, parent_prefix};
