//! Typed auth events.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use bucketdock_entity::session::AuthSession;

/// A change in authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The persisted session (or none) was loaded at start-up.
    InitialSession(Option<AuthSession>),
    /// A user signed in.
    SignedIn(AuthSession),
    /// The user signed out or the session was discarded.
    SignedOut,
    /// The access token was refreshed.
    TokenRefreshed(AuthSession),
    /// A password-recovery link was followed.
    PasswordRecovery(AuthSession),
}

impl AuthEvent {
    /// The session this event leaves in place.
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::InitialSession(session) => session.as_ref(),
            Self::SignedIn(s) | Self::TokenRefreshed(s) | Self::PasswordRecovery(s) => Some(s),
            Self::SignedOut => None,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitialSession(_) => "INITIAL_SESSION",
            Self::SignedIn(_) => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed(_) => "TOKEN_REFRESHED",
            Self::PasswordRecovery(_) => "PASSWORD_RECOVERY",
        }
    }
}

/// Where the view layer should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    /// Target route path.
    pub to: String,
}

impl NavigationIntent {
    /// Navigate to `path`.
    pub fn to(path: impl Into<String>) -> Self {
        Self { to: path.into() }
    }
}

/// Receiver half of the auth event stream.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    pub(crate) fn new(rx: broadcast::Receiver<AuthEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event. Returns `None` once the store is dropped.
    ///
    /// Events missed by a lagging subscriber are skipped.
    pub async fn recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Auth subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next event without waiting.
    pub fn try_recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
