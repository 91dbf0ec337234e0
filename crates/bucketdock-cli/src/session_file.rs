//! Session persistence between invocations.

use std::path::{Path, PathBuf};

use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_entity::session::AuthSession;

/// JSON file holding the current session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// A session file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing file means no session.
    pub async fn load(&self) -> AppResult<Option<AuthSession>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let session = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::session(format!(
                        "Corrupt session file {}: {e}",
                        self.path.display()
                    ))
                })?;
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store `session`, or remove the file when `None`.
    pub async fn save(&self, session: Option<&AuthSession>) -> AppResult<()> {
        match session {
            Some(session) => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let json = serde_json::to_vec_pretty(session)?;
                tokio::fs::write(&self.path, json).await?;
            }
            None => match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        tracing::debug!(path = %self.path.display(), stored = session.is_some(), "Session file updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdock_core::types::UserId;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("nested/session.json"));
        assert!(file.load().await.unwrap().is_none());

        let session = AuthSession {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user_id: UserId::new(),
            email: Some("a@x.com".into()),
            is_recovery: false,
        };
        file.save(Some(&session)).await.unwrap();
        assert_eq!(file.load().await.unwrap(), Some(session));

        file.save(None).await.unwrap();
        assert!(file.load().await.unwrap().is_none());
        file.save(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_session_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"not json").await.unwrap();
        let err = SessionFile::new(path).load().await.unwrap_err();
        assert_eq!(err.kind, bucketdock_core::ErrorKind::Session);
    }
}
