//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `BUCKETDOCK_`-prefixed environment variables.
//! Each sub-module represents a logical configuration section. Every
//! section has defaults so the client starts even when nothing is
//! configured; missing connection details surface later as
//! [`ErrorKind::Configuration`](crate::error::ErrorKind::Configuration).

pub mod backend;
pub mod browse;
pub mod logging;
pub mod session;
pub mod share;
pub mod storage;

use serde::{Deserialize, Serialize};

use self::backend::BackendConfig;
use self::browse::BrowseConfig;
use self::logging::LoggingConfig;
use self::session::SessionConfig;
use self::share::ShareConfig;
use self::storage::StorageConfig;

use crate::error::AppError;

/// Environment variable selecting the configuration overlay.
pub const ENV_VAR: &str = "BUCKETDOCK_ENV";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// configuration (default.toml + environment overlay + env vars).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Object store connection settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metadata/auth backend settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Listing and search settings.
    #[serde(default)]
    pub browse: BrowseConfig,
    /// Share link and presign settings.
    #[serde(default)]
    pub share: ShareConfig,
    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml`, the `config/{env}.toml` overlay and
    /// environment variables prefixed with `BUCKETDOCK_` (sections split
    /// on `__`, e.g. `BUCKETDOCK_STORAGE__ENDPOINT`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BUCKETDOCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Name of the overlay to load, from [`ENV_VAR`] or `development`.
    pub fn environment() -> String {
        std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string())
    }
}
