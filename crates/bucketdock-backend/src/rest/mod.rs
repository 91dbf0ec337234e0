//! REST client for the hosted backend.
//!
//! Paths:
//! - `{url}/rest/v1/{table}` for PostgREST tables
//! - `{url}/rest/v1/rpc/{function}` for remote procedures
//! - `{url}/functions/v1/{name}` for serverless functions
//! - `{url}/auth/v1/*` for the auth service
//!
//! Every request carries the `apikey` header and a bearer token: the bound
//! session's access token, or the anon key when signed out.

pub mod auth;
pub mod metadata;

use std::sync::RwLock;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use bucketdock_core::config::backend::BackendConfig;
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;

/// reqwest-based backend client.
#[derive(Debug)]
pub struct RestBackend {
    client: Client,
    base: Url,
    anon_key: String,
    access_token: RwLock<Option<String>>,
}

impl RestBackend {
    /// Create a client from configuration.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        config.validate()?;
        let base = Url::parse(&format!("{}/", config.base_url()))
            .map_err(|e| AppError::configuration(format!("Invalid backend.url: {e}")))?;

        let mut default_headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.anon_key)
            .map_err(|e| AppError::configuration(format!("Invalid backend.anon_key: {e}")))?;
        default_headers.insert("apikey", api_key);
        let client = Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        tracing::debug!(url = %base, "Initialized backend client");
        Ok(Self {
            client,
            base,
            anon_key: config.anon_key.clone(),
            access_token: RwLock::new(None),
        })
    }

    pub(crate) fn set_token(&self, token: Option<String>) {
        let mut guard = self
            .access_token
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    fn bearer(&self) -> String {
        self.access_token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    /// Resolve a path under the project URL.
    pub(crate) fn url(&self, path: &str) -> AppResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::internal(format!("Invalid backend path '{path}': {e}")))
    }

    /// Start a request authorized as the bound session.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url).bearer_auth(self.bearer())
    }

    /// Start a request authorized with an explicit token.
    pub(crate) fn request_as(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client.request(method, url).bearer_auth(token)
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        context: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let response = send(context, request).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::serialization(format!("{context}: unexpected response body: {e}"))
        })
    }

    /// Send a request and ignore the body.
    pub(crate) async fn send_empty(&self, context: &str, request: RequestBuilder) -> AppResult<()> {
        send(context, request).await.map(|_| ())
    }

    /// Call a remote procedure.
    pub(crate) async fn rpc<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        function: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = self.url(&format!("rest/v1/rpc/{function}"))?;
        let request = self.request(Method::POST, url).json(body);
        self.send_json(function, request).await
    }

    /// Call a remote procedure that returns nothing.
    pub(crate) async fn rpc_void<B: Serialize + ?Sized>(
        &self,
        function: &str,
        body: &B,
    ) -> AppResult<()> {
        let url = self.url(&format!("rest/v1/rpc/{function}"))?;
        let request = self.request(Method::POST, url).json(body);
        self.send_empty(function, request).await
    }

    /// Invoke a serverless function.
    pub(crate) async fn invoke<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        name: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = self.url(&format!("functions/v1/{name}"))?;
        let request = self.request(Method::POST, url).json(body);
        self.send_json(name, request).await
    }
}

async fn send(context: &str, request: RequestBuilder) -> AppResult<Response> {
    let response = request.send().await.map_err(|e| {
        AppError::external_service(format!("{context}: backend unreachable: {e}"))
    })?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(map_status(context, status, &body))
}

/// Map a failed response onto an [`AppError`] by status code.
pub(crate) fn map_status(context: &str, status: StatusCode, body: &str) -> AppError {
    let from_body = error_message(body);
    // Functions report their own admin check as a 400 with an error body.
    let admin_check_failed = from_body
        .as_deref()
        .is_some_and(|m| m.starts_with("Unauthorized"));
    let message = from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::debug!(%status, context, %message, "Backend call failed");

    if admin_check_failed {
        return AppError::authorization(message);
    }
    match status.as_u16() {
        401 => AppError::authentication(message),
        403 => AppError::authorization(message),
        404 | 406 => AppError::not_found(message),
        409 => AppError::conflict(message),
        400..=499 => AppError::validation(message),
        _ => AppError::external_service(format!("{context}: {message}")),
    }
}

/// Pull a human-readable message out of a backend error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error_description", "msg", "error"]
        .iter()
        .find_map(|field| value.get(field).and_then(|v| v.as_str()))
        .map(str::to_string)
}
