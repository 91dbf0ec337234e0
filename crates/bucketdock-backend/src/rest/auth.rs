//! Auth service endpoints over REST.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use bucketdock_core::result::AppResult;
use bucketdock_core::types::UserId;
use bucketdock_entity::session::AuthSession;

use super::RestBackend;
use crate::traits::AuthProvider;

/// Token grant response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(self.expires_in.unwrap_or(3600)));
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user_id: self.user.id,
            email: self.user.email,
            is_recovery: false,
        }
    }
}

#[async_trait]
impl AuthProvider for RestBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let mut url = self.url("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self
            .request(Method::POST, url)
            .json(&json!({ "email": email, "password": password }));
        let token: TokenResponse = self.send_json("sign_in", request).await?;
        tracing::info!(user_id = %token.user.id, "Signed in");
        Ok(token.into_session())
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<Option<AuthSession>> {
        let url = self.url("auth/v1/signup")?;
        let request = self
            .request(Method::POST, url)
            .json(&json!({ "email": email, "password": password }));
        let body: serde_json::Value = self.send_json("sign_up", request).await?;
        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body)?;
            Ok(Some(token.into_session()))
        } else {
            Ok(None)
        }
    }

    async fn sign_out(&self, session: &AuthSession) -> AppResult<()> {
        let url = self.url("auth/v1/logout")?;
        let request = self.request_as(Method::POST, url, &session.access_token);
        self.send_empty("sign_out", request).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let mut url = self.url("auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        let request = self
            .request(Method::POST, url)
            .json(&json!({ "refresh_token": refresh_token }));
        let token: TokenResponse = self.send_json("refresh_session", request).await?;
        Ok(token.into_session())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> AppResult<()> {
        let mut url = self.url("auth/v1/recover")?;
        if !redirect_to.is_empty() {
            url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        }
        let request = self
            .request(Method::POST, url)
            .json(&json!({ "email": email }));
        self.send_empty("reset_password", request).await
    }

    async fn update_password(&self, session: &AuthSession, new_password: &str) -> AppResult<()> {
        let url = self.url("auth/v1/user")?;
        let request = self
            .request_as(Method::PUT, url, &session.access_token)
            .json(&json!({ "password": new_password }));
        self.send_empty("update_password", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_prefers_absolute_expiry() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "expires_at": 1_900_000_000,
            "user": { "id": "2b0b8f7e-9f59-4e0f-8f56-4a9b7c3a0d22", "email": "a@x.com" }
        }))
        .unwrap();
        let session = token.into_session();
        assert_eq!(session.expires_at.timestamp(), 1_900_000_000);
        assert_eq!(session.email.as_deref(), Some("a@x.com"));
    }
}
