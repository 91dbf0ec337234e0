//! Per-action view state.

use serde::Serialize;

use bucketdock_core::result::AppResult;

/// Lifecycle of a user action as a view renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum ActionState {
    /// Nothing has happened yet.
    #[default]
    Idle,
    /// The action is running.
    InFlight(String),
    /// The action finished.
    Succeeded(String),
    /// The action failed.
    Failed(String),
}

impl ActionState {
    /// Settle from a result.
    pub fn settle<T>(result: &AppResult<T>, success: impl Into<String>) -> Self {
        match result {
            Ok(_) => Self::Succeeded(success.into()),
            Err(e) => Self::Failed(e.message.clone()),
        }
    }

    /// Whether a submit control should be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::InFlight(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdock_core::error::AppError;

    #[test]
    fn test_settle() {
        let ok: AppResult<()> = Ok(());
        assert_eq!(
            ActionState::settle(&ok, "Saved"),
            ActionState::Succeeded("Saved".into())
        );
        let err: AppResult<()> = Err(AppError::validation("bad"));
        assert_eq!(ActionState::settle(&err, "Saved"), ActionState::Failed("bad".into()));
        assert!(ActionState::InFlight("x".into()).is_busy());
    }
}
