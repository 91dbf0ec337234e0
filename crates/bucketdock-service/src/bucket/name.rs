//! Bucket name rules.

use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 63;

/// Check a bucket name against the object store's naming rules.
///
/// 3 to 63 characters of lowercase letters, digits, `.` and `-`, starting
/// and ending with a letter or digit.
pub fn validate_bucket_name(name: &str) -> AppResult<()> {
    let len = name.len();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(AppError::validation(format!(
            "Bucket name must be between {MIN_LEN} and {MAX_LEN} characters"
        )));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'-')
    {
        return Err(AppError::validation(
            "Bucket name may only contain lowercase letters, numbers, dots and hyphens",
        ));
    }
    let alnum = |b: Option<u8>| b.is_some_and(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    if !alnum(name.bytes().next()) || !alnum(name.bytes().last()) {
        return Err(AppError::validation(
            "Bucket name must start and end with a letter or number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["abc", "my-bucket", "logs.2024", &"a".repeat(63)] {
            assert!(validate_bucket_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["ab", "My-Bucket", "-bucket", "bucket.", "has space", &"a".repeat(64)] {
            assert!(validate_bucket_name(name).is_err(), "{name}");
        }
    }
}
