//! Session persistence configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the signed-in session is kept between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the session file.
    #[serde(default = "default_session_file")]
    pub file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".bucketdock/session.json")
}
