//! Metadata and auth backend configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Hosted backend (REST tables, RPCs, functions, auth) configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://project.example.co`.
    #[serde(default)]
    pub url: String,
    /// Public anonymous API key.
    #[serde(default)]
    pub anon_key: String,
    /// Where password-reset emails send the user.
    #[serde(default)]
    pub password_reset_redirect: String,
}

impl BackendConfig {
    /// Check that the URL and anon key are present.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.url.trim().is_empty() || self.anon_key.trim().is_empty() {
            return Err(AppError::configuration(
                "Backend is not configured (set backend.url and backend.anon_key)",
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}
