//! Storage quota value object.

use serde::{Deserialize, Serialize};

/// Quota information for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageQuota {
    /// Total quota in bytes (None = unlimited).
    pub total_bytes: Option<i64>,
    /// Currently used bytes.
    pub used_bytes: i64,
    /// Available bytes (None if unlimited).
    pub available_bytes: Option<i64>,
    /// Usage percentage (0.0 - 100.0, None if unlimited).
    pub usage_percent: Option<f64>,
}

impl StorageQuota {
    /// Create a quota from total and used values.
    pub fn new(total_bytes: Option<i64>, used_bytes: i64) -> Self {
        let available_bytes = total_bytes.map(|total| (total - used_bytes).max(0));
        let usage_percent = total_bytes.map(|total| {
            if total == 0 {
                0.0
            } else {
                ((used_bytes as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
            }
        });

        Self {
            total_bytes,
            used_bytes,
            available_bytes,
            usage_percent,
        }
    }

    /// Check if the quota is exceeded.
    pub fn is_exceeded(&self) -> bool {
        match self.total_bytes {
            Some(total) => self.used_bytes >= total,
            None => false,
        }
    }

    /// Check if adding the given number of bytes would exceed the quota.
    pub fn would_exceed(&self, additional_bytes: i64) -> bool {
        match self.total_bytes {
            Some(total) => (self.used_bytes + additional_bytes) > total,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_would_exceed() {
        let quota = StorageQuota::new(Some(100), 60);
        assert_eq!(quota.available_bytes, Some(40));
        assert!(!quota.would_exceed(40));
        assert!(quota.would_exceed(41));
        assert!(!StorageQuota::new(None, 10_000).would_exceed(i64::MAX / 2));
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(StorageQuota::new(Some(10), 50).usage_percent, Some(100.0));
        assert_eq!(StorageQuota::new(Some(0), 0).usage_percent, Some(0.0));
    }
}
