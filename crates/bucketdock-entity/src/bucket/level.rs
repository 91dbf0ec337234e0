//! Bucket visibility levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a bucket is exposed to viewers who are not members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicLevel {
    /// Only the owner and members can see the bucket.
    #[default]
    Private,
    /// Anyone with the route can list and download.
    #[serde(alias = "public-read")]
    ReadOnly,
    /// Anyone with the route can list, download and upload.
    #[serde(alias = "public-read-write")]
    ReadWrite,
}

impl PublicLevel {
    /// Whether anonymous viewers may open the bucket.
    pub fn allows_anonymous_read(&self) -> bool {
        !matches!(self, Self::Private)
    }

    /// Whether anonymous viewers may upload.
    pub fn allows_anonymous_write(&self) -> bool {
        matches!(self, Self::ReadWrite)
    }

    /// Return the level as stored by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
        }
    }
}

impl fmt::Display for PublicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PublicLevel {
    type Err = bucketdock_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "read-only" | "public-read" => Ok(Self::ReadOnly),
            "read-write" | "public-read-write" => Ok(Self::ReadWrite),
            _ => Err(bucketdock_core::AppError::validation(format!(
                "Invalid public level: '{s}'. Expected one of: private, read-only, read-write"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!("public-read".parse::<PublicLevel>().unwrap(), PublicLevel::ReadOnly);
        assert_eq!(
            serde_json::from_str::<PublicLevel>("\"public-read-write\"").unwrap(),
            PublicLevel::ReadWrite
        );
        assert_eq!(
            serde_json::to_string(&PublicLevel::ReadWrite).unwrap(),
            "\"read-write\""
        );
        assert!("public".parse::<PublicLevel>().is_err());
    }

    #[test]
    fn test_anonymous_access() {
        assert!(!PublicLevel::Private.allows_anonymous_read());
        assert!(PublicLevel::ReadOnly.allows_anonymous_read());
        assert!(!PublicLevel::ReadOnly.allows_anonymous_write());
        assert!(PublicLevel::ReadWrite.allows_anonymous_write());
    }
}
