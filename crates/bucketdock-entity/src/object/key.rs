//! Key and size formatting.

use serde::{Deserialize, Serialize};

const SIZE_UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// One segment of a folder path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder name.
    pub name: String,
    /// Full prefix of the folder, ending in `/`.
    pub prefix: String,
}

/// Whether `key` names a folder.
pub fn is_folder_key(key: &str) -> bool {
    key.ends_with('/')
}

/// Last path segment of a key or folder prefix.
///
/// `photos/2024/cat.png` → `cat.png`, `photos/2024/` → `2024`.
pub fn display_name(key: &str) -> &str {
    let trimmed = key.strip_suffix('/').unwrap_or(key);
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Prefix of the folder containing `key`; empty at the bucket root.
pub fn parent_prefix(key: &str) -> &str {
    let trimmed = key.strip_suffix('/').unwrap_or(key);
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[..=idx],
        None => "",
    }
}

/// Breadcrumb trail for a folder prefix, root excluded.
pub fn breadcrumbs(prefix: &str) -> Vec<Breadcrumb> {
    let mut trail = Vec::new();
    let mut acc = String::new();
    for segment in prefix.split('/').filter(|s| !s.is_empty()) {
        acc.push_str(segment);
        acc.push('/');
        trail.push(Breadcrumb {
            name: segment.to_string(),
            prefix: acc.clone(),
        });
    }
    trail
}

/// Human-readable size with binary multiples and up to two decimals.
///
/// `0` → `0 Bytes`, `1536` → `1.5 KB`, `1048576` → `1 MB`.
pub fn format_bytes(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{rounded} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("photos/2024/cat.png"), "cat.png");
        assert_eq!(display_name("photos/2024/"), "2024");
        assert_eq!(display_name("readme.md"), "readme.md");
    }

    #[test]
    fn test_parent_prefix() {
        assert_eq!(parent_prefix("photos/2024/cat.png"), "photos/2024/");
        assert_eq!(parent_prefix("photos/2024/"), "photos/");
        assert_eq!(parent_prefix("photos/"), "");
    }

    #[test]
    fn test_breadcrumbs() {
        let trail = breadcrumbs("a/b/c/");
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[1].name, "b");
        assert_eq!(trail[2].prefix, "a/b/c/");
        assert!(breadcrumbs("").is_empty());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
    }
}
