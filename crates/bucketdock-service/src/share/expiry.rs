//! Share link lifetime.

use serde::{Deserialize, Serialize};

use bucketdock_core::error::AppError;
use bucketdock_core::limits::MAX_PRESIGN_EXPIRY_SECS;
use bucketdock_core::result::AppResult;

/// Link lifetime as entered: days, hours (0 to 23) and minutes (0 to 59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryDuration {
    /// Whole days.
    pub days: u64,
    /// Hours, 0 to 23.
    pub hours: u64,
    /// Minutes, 0 to 59.
    pub minutes: u64,
}

impl Default for ExpiryDuration {
    fn default() -> Self {
        Self::minutes(15)
    }
}

impl ExpiryDuration {
    /// A lifetime of `days`, `hours` and `minutes`.
    pub fn new(days: u64, hours: u64, minutes: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
        }
    }

    /// A lifetime of `minutes` only.
    pub fn minutes(minutes: u64) -> Self {
        Self::new(0, 0, minutes)
    }

    /// Total lifetime in seconds.
    pub fn total_secs(&self) -> u64 {
        self.days
            .saturating_mul(86_400)
            .saturating_add(self.hours.saturating_mul(3_600))
            .saturating_add(self.minutes.saturating_mul(60))
    }

    /// Check the fields and return the lifetime in seconds.
    ///
    /// The total must be positive and at most seven days.
    pub fn validate(&self) -> AppResult<u64> {
        if self.hours > 23 {
            return Err(AppError::validation("Hours must be between 0 and 23"));
        }
        if self.minutes > 59 {
            return Err(AppError::validation("Minutes must be between 0 and 59"));
        }
        let secs = self.total_secs();
        if secs == 0 {
            return Err(AppError::validation("Expiration must be greater than zero"));
        }
        if secs > MAX_PRESIGN_EXPIRY_SECS {
            return Err(AppError::validation("Expiration cannot exceed 7 days"));
        }
        Ok(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(ExpiryDuration::new(7, 0, 0).validate().unwrap(), 604_800);
        assert!(ExpiryDuration::new(7, 0, 1).validate().is_err());
        assert!(ExpiryDuration::new(0, 0, 0).validate().is_err());
        assert!(ExpiryDuration::new(0, 24, 0).validate().is_err());
        assert!(ExpiryDuration::new(0, 0, 60).validate().is_err());
        assert_eq!(ExpiryDuration::default().validate().unwrap(), 900);
    }
}
