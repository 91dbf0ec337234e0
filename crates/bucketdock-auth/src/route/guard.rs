//! Route guard.

use bucketdock_entity::bucket::PublicLevel;

use super::path::Route;
use crate::session::{ProfileState, SessionState};

/// What the view layer should do with a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the route.
    Render,
    /// Go somewhere else.
    Redirect(String),
    /// State is still loading; show a spinner.
    Pending,
}

impl GuardDecision {
    fn to_login() -> Self {
        Self::Redirect(Route::Login.path())
    }
}

/// Decides whether a route may be shown for the current auth state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Evaluate `route`.
    ///
    /// `bucket_level` is the public level of the bucket a `/bucket/...`
    /// route points at, when known; `None` is treated as private.
    pub fn evaluate(
        route: &Route,
        session: &SessionState,
        profile: &ProfileState,
        bucket_level: Option<PublicLevel>,
    ) -> GuardDecision {
        match route {
            Route::Login | Route::NotFound(_) => GuardDecision::Render,
            Route::Bucket { .. } => {
                let public = bucket_level.is_some_and(|level| level != PublicLevel::Private);
                if public {
                    return GuardDecision::Render;
                }
                Self::require_session(session)
            }
            Route::Admin => match Self::require_session(session) {
                GuardDecision::Render => match profile {
                    ProfileState::Loading => GuardDecision::Pending,
                    ProfileState::Ready(Some(p)) if p.is_admin() => GuardDecision::Render,
                    ProfileState::Ready(_) => GuardDecision::Redirect(Route::Home.path()),
                },
                other => other,
            },
            Route::UpdatePassword | Route::Home | Route::Search { .. } => {
                Self::require_session(session)
            }
        }
    }

    fn require_session(session: &SessionState) -> GuardDecision {
        match session {
            SessionState::Loading => GuardDecision::Pending,
            SessionState::Ready(Some(_)) => GuardDecision::Render,
            SessionState::Ready(None) => GuardDecision::to_login(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdock_core::types::UserId;
    use bucketdock_entity::profile::{Profile, UserRole};
    use bucketdock_entity::session::AuthSession;
    use chrono::{Duration, Utc};

    fn signed_in() -> SessionState {
        SessionState::Ready(Some(AuthSession {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user_id: UserId::new(),
            email: None,
            is_recovery: false,
        }))
    }

    fn profile(role: UserRole) -> ProfileState {
        ProfileState::Ready(Some(Profile {
            id: UserId::new(),
            full_name: None,
            email: None,
            role,
            is_active: true,
            space_limit: 0,
            space_used: 0,
        }))
    }

    const ANON: SessionState = SessionState::Ready(None);

    #[test]
    fn test_protected_routes_redirect_anonymous() {
        for route in [
            Route::Home,
            Route::UpdatePassword,
            Route::Search { query: "a".into() },
            Route::Admin,
        ] {
            assert_eq!(
                RouteGuard::evaluate(&route, &ANON, &ProfileState::Ready(None), None),
                GuardDecision::Redirect("/login".into()),
                "{route}"
            );
        }
        assert_eq!(
            RouteGuard::evaluate(&Route::Login, &ANON, &ProfileState::Ready(None), None),
            GuardDecision::Render
        );
    }

    #[test]
    fn test_public_bucket_renders_anonymously() {
        let route = Route::bucket("shared", "");
        let none = ProfileState::Ready(None);
        assert_eq!(
            RouteGuard::evaluate(&route, &ANON, &none, Some(PublicLevel::ReadWrite)),
            GuardDecision::Render
        );
        assert_eq!(
            RouteGuard::evaluate(&route, &ANON, &none, Some(PublicLevel::ReadOnly)),
            GuardDecision::Render
        );
        assert_eq!(
            RouteGuard::evaluate(&route, &ANON, &none, Some(PublicLevel::Private)),
            GuardDecision::Redirect("/login".into())
        );
        assert_eq!(
            RouteGuard::evaluate(&route, &signed_in(), &none, Some(PublicLevel::Private)),
            GuardDecision::Render
        );
    }

    #[test]
    fn test_admin_requires_admin_profile() {
        let session = signed_in();
        assert_eq!(
            RouteGuard::evaluate(&Route::Admin, &session, &profile(UserRole::User), None),
            GuardDecision::Redirect("/".into())
        );
        assert_eq!(
            RouteGuard::evaluate(&Route::Admin, &session, &profile(UserRole::Admin), None),
            GuardDecision::Render
        );
        assert_eq!(
            RouteGuard::evaluate(&Route::Admin, &session, &ProfileState::Loading, None),
            GuardDecision::Pending
        );
    }

    #[test]
    fn test_loading_session_is_pending() {
        assert_eq!(
            RouteGuard::evaluate(
                &Route::Home,
                &SessionState::Loading,
                &ProfileState::Loading,
                None
            ),
            GuardDecision::Pending
        );
    }
}
