//! Typed HTTP client for the remote API.
//!
//! Wraps `reqwest` with the three portal-wide behaviors every call
//! shares: bearer-token injection from the session manager, uniform
//! error mapping, and the global 401 hook that invalidates the session
//! for any protected endpoint.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::error::ApiError;
use crate::config::PortalConfig;
use crate::session::SessionManager;

/// Paths that authenticate rather than require authentication.
/// They carry no bearer token, and a 401 from them means bad
/// credentials, never an expired session.
fn is_auth_exempt(path: &str) -> bool {
    path == "/auth/login" || path == "/auth/register"
}

/// HTTP client bound to one API base URL and one session manager.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    timeout_secs: u64,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(config: &PortalConfig, session: Arc<SessionManager>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout_secs: config.request_timeout.as_secs(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Typed verbs ─────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.get(self.url(path));
        let response = self.send_checked(request, path).await?;
        Self::parse(response).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.post(self.url(path)).json(body);
        let response = self.send_checked(request, path).await?;
        Self::parse(response).await
    }

    /// POST whose success response body is irrelevant (e.g. password
    /// change). Status is still checked; the body is discarded.
    pub async fn post_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.http.post(self.url(path)).json(body);
        self.send_checked(request, path).await?;
        Ok(())
    }

    /// POST with no request body, returning the parsed response.
    pub async fn post_no_body<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.post(self.url(path));
        let response = self.send_checked(request, path).await?;
        Self::parse(response).await
    }

    // ── Shared pipeline ─────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, send, and check the status.
    ///
    /// A 401 from a protected path invalidates the session (the global
    /// hook) and surfaces as `Unauthorized`; a 401 from login/register
    /// flows through as an ordinary API error carrying the server's
    /// message, so bad credentials read as bad credentials.
    async fn send_checked(
        &self,
        mut request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        if !is_auth_exempt(path) {
            if let Some(token) = self.session.bearer_token() {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(|e| self.map_transport(e))?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED && !is_auth_exempt(path) {
            tracing::debug!(path, "Unauthorized response from protected endpoint");
            self.session.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_failure(status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn map_transport(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
