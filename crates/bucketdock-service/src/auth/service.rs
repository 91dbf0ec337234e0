//! Authentication flows.
//!
//! Each flow calls the auth provider, rebinds the backend client to the
//! new session and publishes the matching [`AuthEvent`].

use std::sync::Arc;

use tracing::{info, warn};
use validator::ValidateEmail;

use bucketdock_auth::{
    AuthEvent, NavigationIntent, ProfileStore, RequestContext, SessionStore,
};
use bucketdock_backend::{AuthProvider, MetadataBackend};
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_entity::profile::Profile;
use bucketdock_entity::session::AuthSession;

/// Shortest accepted password.
const MIN_PASSWORD_LEN: usize = 6;

/// Drives the auth provider and keeps the session and profile stores current.
#[derive(Debug, Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthProvider>,
    backend: Arc<dyn MetadataBackend>,
    sessions: Arc<SessionStore>,
    profiles: Arc<ProfileStore>,
    reset_redirect: String,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        backend: Arc<dyn MetadataBackend>,
        sessions: Arc<SessionStore>,
        profiles: Arc<ProfileStore>,
        reset_redirect: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            backend,
            sessions,
            profiles,
            reset_redirect: reset_redirect.into(),
        }
    }

    /// The session store.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// The profile store.
    pub fn profiles(&self) -> &Arc<ProfileStore> {
        &self.profiles
    }

    /// Snapshot of who is acting.
    pub fn context(&self) -> RequestContext {
        let session = self.sessions.session();
        let profile = self.profiles.profile();
        RequestContext::from_state(session.as_ref(), profile.as_ref())
    }

    /// Sign in with email and password.
    ///
    /// The profile is loaded before the session is published; a missing
    /// or inactive profile signs the user straight back out.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Profile> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }
        let session = self.auth.sign_in_with_password(email, password).await?;
        self.backend.use_session(Some(&session));

        let profile = match self.backend.get_profile(session.user_id).await {
            Ok(profile) if profile.is_active => profile,
            Ok(_) => {
                self.discard(&session).await;
                return Err(AppError::authentication(
                    "Your account has been deactivated. Please contact an administrator.",
                ));
            }
            Err(e) => {
                self.discard(&session).await;
                return Err(AppError::authentication(format!(
                    "Could not load your profile: {}",
                    e.message
                )));
            }
        };

        info!(user_id = %session.user_id, "User signed in");
        self.sessions.apply(AuthEvent::SignedIn(session));
        self.profiles.set(Some(profile.clone()));
        Ok(profile)
    }

    /// Register a new account. Returns whether the user is now signed in.
    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<bool> {
        let email = email.trim();
        if !email.validate_email() {
            return Err(AppError::validation(format!("Invalid email address: {email}")));
        }
        check_password(password)?;
        match self.auth.sign_up(email, password).await? {
            Some(session) => {
                self.backend.use_session(Some(&session));
                let profile = self.backend.get_profile(session.user_id).await.ok();
                info!(user_id = %session.user_id, "User signed up");
                self.sessions.apply(AuthEvent::SignedIn(session));
                self.profiles.set(profile);
                Ok(true)
            }
            None => {
                info!(email, "Sign-up pending email confirmation");
                Ok(false)
            }
        }
    }

    /// Send a password reset email.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let email = email.trim();
        if !email.validate_email() {
            return Err(AppError::validation(format!("Invalid email address: {email}")));
        }
        self.auth
            .reset_password_for_email(email, &self.reset_redirect)
            .await
    }

    /// Set a new password for the signed-in user.
    pub async fn update_password(&self, new_password: &str) -> AppResult<()> {
        check_password(new_password)?;
        let session = self
            .sessions
            .session()
            .ok_or_else(|| AppError::authentication("Sign in required"))?;
        self.auth.update_password(&session, new_password).await?;
        info!(user_id = %session.user_id, "Password updated");
        if session.is_recovery {
            let session = AuthSession {
                is_recovery: false,
                ..session
            };
            self.sessions.apply(AuthEvent::TokenRefreshed(session));
        }
        Ok(())
    }

    /// Sign out. Local state is cleared even if the provider call fails.
    pub async fn sign_out(&self) -> AppResult<()> {
        if let Some(session) = self.sessions.session() {
            if let Err(e) = self.auth.sign_out(&session).await {
                warn!(error = %e, "Sign-out request failed");
            }
            info!(user_id = %session.user_id, "User signed out");
        }
        self.backend.use_session(None);
        self.sessions.apply(AuthEvent::SignedOut);
        self.profiles.set(None);
        Ok(())
    }

    /// Restore a persisted session at start-up.
    ///
    /// Expired sessions are refreshed first; one that cannot be refreshed
    /// is dropped. A recovery session navigates to the password form.
    pub async fn restore(&self, persisted: Option<AuthSession>) -> Option<NavigationIntent> {
        let session = match persisted {
            Some(session) if session.is_expired() => {
                match self.auth.refresh_session(&session.refresh_token).await {
                    Ok(fresh) => Some(AuthSession {
                        is_recovery: session.is_recovery,
                        ..fresh
                    }),
                    Err(e) => {
                        warn!(error = %e, "Could not refresh stored session");
                        None
                    }
                }
            }
            other => other,
        };

        self.backend.use_session(session.as_ref());
        let Some(session) = session else {
            self.sessions.apply(AuthEvent::InitialSession(None));
            self.profiles.set(None);
            return None;
        };

        self.profiles.set_loading();
        let intent = if session.is_recovery {
            self.sessions.apply(AuthEvent::PasswordRecovery(session.clone()))
        } else {
            self.sessions
                .apply(AuthEvent::InitialSession(Some(session.clone())))
        };
        self.reload_profile(&session).await;
        intent
    }

    /// Fetch the signed-in user's profile again.
    pub async fn refresh_profile(&self) -> AppResult<Option<Profile>> {
        let Some(session) = self.sessions.session() else {
            self.profiles.set(None);
            return Ok(None);
        };
        let profile = self.backend.get_profile(session.user_id).await?;
        self.profiles.set(Some(profile.clone()));
        Ok(Some(profile))
    }

    async fn reload_profile(&self, session: &AuthSession) {
        match self.backend.get_profile(session.user_id).await {
            Ok(profile) => self.profiles.set(Some(profile)),
            Err(e) => {
                warn!(user_id = %session.user_id, error = %e, "Could not load profile");
                self.profiles.set(None);
            }
        }
    }

    async fn discard(&self, session: &AuthSession) {
        if let Err(e) = self.auth.sign_out(session).await {
            warn!(error = %e, "Sign-out after rejected sign-in failed");
        }
        self.backend.use_session(None);
        self.sessions.apply(AuthEvent::SignedOut);
        self.profiles.set(None);
    }
}

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
