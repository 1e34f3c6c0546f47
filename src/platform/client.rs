//! Feishu open-platform client
//!
//! [`PlatformAuthClient`] wraps the handful of REST calls needed to get a
//! file into a user's Drive:
//!
//! 1. Fetch an application access token with the app credentials.
//! 2. Send the user to the authorization page ([`PlatformAuthClient::get_oauth_url`]).
//! 3. Exchange the returned `code` for a user access token, refreshing it
//!    later with the refresh token.
//! 4. Upload the file with the user access token.
//!
//! Each operation is one HTTP round trip. The only state kept between calls
//! is the cached application access token, which is owned by the client and
//! updated through `&mut self`.

use std::fmt;
use std::time::Duration;

use serde_json::{json, Value};

use crate::config::FeishuConfig;
use crate::error::{FeishuError, Result};
use crate::platform::envelope::{data_field, into_payload};
use crate::platform::upload::{UploadRequest, UPLOAD_PATH};

/// Production base URL of the Feishu open platform.
pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn";

/// Endpoint issuing application access tokens for self-built apps.
pub const APP_ACCESS_TOKEN_PATH: &str = "/open-apis/auth/v3/app_access_token/internal";

/// Endpoint exchanging an authorization code for a user access token.
pub const USER_ACCESS_TOKEN_PATH: &str = "/open-apis/authen/v1/access_token";

/// Endpoint exchanging a refresh token for a new user access token.
pub const REFRESH_ACCESS_TOKEN_PATH: &str = "/open-apis/authen/v1/refresh_access_token";

/// Application credentials issued by the developer console.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// Client for the Feishu OAuth and Drive upload endpoints.
///
/// # Examples
///
/// ```
/// use feishu_drive::platform::client::PlatformAuthClient;
///
/// let mut client = PlatformAuthClient::default();
/// client.set_credentials("cli_a1", "secret");
///
/// let url = client.get_oauth_url("https://example.com/callback");
/// assert_eq!(
///     url,
///     "https://open.feishu.cn/open-apis/authen/v1/index?app_id=cli_a1&redirect_uri=https://example.com/callback"
/// );
/// assert!(client.app_access_token().is_none());
/// ```
pub struct PlatformAuthClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    app_access_token: Option<String>,
}

impl Default for PlatformAuthClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for PlatformAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformAuthClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field(
                "app_access_token",
                &self.app_access_token.as_ref().map(|_| "<cached>"),
            )
            .finish()
    }
}

impl PlatformAuthClient {
    /// Creates a client for `base_url` with empty credentials.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Creates a client that sends requests through `http`.
    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            credentials: Credentials::default(),
            app_access_token: None,
        }
    }

    /// Builds a client from configuration, applying the request timeout and
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns [`FeishuError::Http`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &FeishuConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(FeishuError::Http)?;

        let mut client = Self::with_http_client(config.base_url.clone(), http);
        client.set_credentials(config.app_id.clone(), config.app_secret.clone());
        Ok(client)
    }

    /// Stores the application credentials, replacing any previous ones.
    ///
    /// No validation is performed. A cached application token obtained
    /// with the previous credentials is kept.
    pub fn set_credentials(&mut self, app_id: impl Into<String>, app_secret: impl Into<String>) {
        self.credentials = Credentials {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        };
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the cached application access token, if one has been fetched.
    pub fn app_access_token(&self) -> Option<&str> {
        self.app_access_token.as_deref()
    }

    /// Fetches a new application access token and caches it.
    ///
    /// Every successful call overwrites the cached token.
    ///
    /// # Errors
    ///
    /// - [`FeishuError::Http`] on transport failure or an undecodable body.
    /// - [`FeishuError::RemoteApi`] if `code` is not `0`.
    /// - [`FeishuError::MalformedResponse`] if a success body has no
    ///   non-empty `app_access_token` string. Nothing is cached then.
    pub async fn get_app_access_token(&mut self) -> Result<String> {
        let body = json!({
            "app_id": self.credentials.app_id,
            "app_secret": self.credentials.app_secret,
        });

        let payload = self.post_json(APP_ACCESS_TOKEN_PATH, &body, None).await?;

        let token = payload
            .get("app_access_token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                FeishuError::MalformedResponse(
                    "app_access_token missing or empty in success response".to_string(),
                )
            })?
            .to_string();

        tracing::debug!(app_id = %self.credentials.app_id, "cached new app access token");
        self.app_access_token = Some(token.clone());
        Ok(token)
    }

    /// Formats the authorization page URL.
    ///
    /// `redirect_uri` is inserted verbatim, without percent-encoding. Use
    /// [`AuthorizationRequest`](super::authorize::AuthorizationRequest) when
    /// the redirect URI carries its own query string.
    pub fn get_oauth_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}{}?app_id={}&redirect_uri={}",
            self.base_url,
            super::authorize::AUTHORIZE_PATH,
            self.credentials.app_id,
            redirect_uri
        )
    }

    /// Exchanges an authorization code for a user token bundle.
    ///
    /// Fetches the application access token first if none is cached. The
    /// returned value is the response's `data` object, unmodified.
    ///
    /// # Errors
    ///
    /// Same as [`get_app_access_token`](Self::get_app_access_token) for the
    /// token fetch, then [`FeishuError::Http`] or [`FeishuError::RemoteApi`]
    /// for the exchange itself.
    pub async fn get_user_access_token(&mut self, code: &str) -> Result<Value> {
        let app_token = self.bearer_app_token().await?;
        let body = json!({
            "grant_type": "authorization_code",
            "code": code,
        });

        let payload = self
            .post_json(USER_ACCESS_TOKEN_PATH, &body, Some(&app_token))
            .await?;
        Ok(data_field(payload))
    }

    /// Exchanges a refresh token for a new user token bundle.
    ///
    /// Behaves like [`get_user_access_token`](Self::get_user_access_token)
    /// with `grant_type` set to `refresh_token`.
    pub async fn refresh_user_access_token(&mut self, refresh_token: &str) -> Result<Value> {
        let app_token = self.bearer_app_token().await?;
        let body = json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
        });

        let payload = self
            .post_json(REFRESH_ACCESS_TOKEN_PATH, &body, Some(&app_token))
            .await?;
        Ok(data_field(payload))
    }

    /// Uploads `file_bytes` to the root of the user's Drive.
    ///
    /// Authenticates with `user_access_token`; the cached application token
    /// is never sent.
    pub async fn upload_file(
        &self,
        file_bytes: Vec<u8>,
        file_name: &str,
        user_access_token: &str,
    ) -> Result<Value> {
        self.upload(UploadRequest::new(file_name, file_bytes), user_access_token)
            .await
    }

    /// Uploads a file described by an [`UploadRequest`].
    ///
    /// # Errors
    ///
    /// - [`FeishuError::Http`] on transport failure, an undecodable body or
    ///   an invalid content type.
    /// - [`FeishuError::RemoteApi`] if `code` is not `0`.
    pub async fn upload(&self, request: UploadRequest, user_access_token: &str) -> Result<Value> {
        let url = self.endpoint(UPLOAD_PATH);
        tracing::debug!(
            file_name = %request.file_name,
            size = request.size(),
            "uploading file"
        );

        let form = request.into_form()?;
        let resp = self
            .http
            .post(&url)
            .bearer_auth(user_access_token)
            .multipart(form)
            .send()
            .await
            .map_err(FeishuError::Http)?;

        let payload = Self::decode(UPLOAD_PATH, resp).await?;
        Ok(data_field(payload))
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the cached application token, fetching one if absent.
    async fn bearer_app_token(&mut self) -> Result<String> {
        if let Some(token) = &self.app_access_token {
            return Ok(token.clone());
        }
        self.get_app_access_token().await
    }

    async fn post_json(&self, path: &str, body: &Value, bearer: Option<&str>) -> Result<Value> {
        let mut request = self.http.post(self.endpoint(path)).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(FeishuError::Http)?;
        Self::decode(path, resp).await
    }

    /// Decodes the JSON body and checks the envelope. The HTTP status is
    /// not consulted; the platform reports failures through `code`.
    async fn decode(path: &str, resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        let body: Value = resp.json().await.map_err(FeishuError::Http)?;

        let result = into_payload(body);
        match &result {
            Ok(_) => tracing::debug!(path, %status, "request succeeded"),
            Err(e) => tracing::debug!(path, %status, error = %e, "request rejected by platform"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_production_base() {
        let client = PlatformAuthClient::default();
        assert_eq!(client.base_url(), "https://open.feishu.cn");
        assert_eq!(client.credentials(), &Credentials::default());
        assert!(client.app_access_token().is_none());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = PlatformAuthClient::new("http://127.0.0.1:9000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
        assert_eq!(
            client.endpoint(APP_ACCESS_TOKEN_PATH),
            "http://127.0.0.1:9000/open-apis/auth/v3/app_access_token/internal"
        );
    }

    #[test]
    fn test_set_credentials_overwrites() {
        let mut client = PlatformAuthClient::default();
        client.set_credentials("first", "s1");
        client.set_credentials("second", "s2");
        assert_eq!(client.credentials().app_id, "second");
        assert_eq!(client.credentials().app_secret, "s2");
    }

    #[test]
    fn test_get_oauth_url_is_not_encoded() {
        let mut client = PlatformAuthClient::default();
        client.set_credentials("cli_x", "s");
        let url = client.get_oauth_url("https://a.example/cb?x=1&y=2");
        assert_eq!(
            url,
            "https://open.feishu.cn/open-apis/authen/v1/index?app_id=cli_x&redirect_uri=https://a.example/cb?x=1&y=2"
        );
    }

    #[test]
    fn test_get_oauth_url_is_deterministic() {
        let mut client = PlatformAuthClient::default();
        client.set_credentials("cli_x", "s");
        assert_eq!(
            client.get_oauth_url("https://a.example/cb"),
            client.get_oauth_url("https://a.example/cb")
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut client = PlatformAuthClient::default();
        client.set_credentials("cli_x", "top-secret");
        let rendered = format!("{client:?}");
        assert!(rendered.contains("cli_x"));
        assert!(!rendered.contains("top-secret"));
    }

    #[test]
    fn test_from_config_applies_credentials() {
        let config = FeishuConfig {
            base_url: "http://localhost:1234".to_string(),
            app_id: "cli_cfg".to_string(),
            app_secret: "cfg-secret".to_string(),
            ..FeishuConfig::default()
        };
        let client = PlatformAuthClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
        assert_eq!(client.credentials().app_id, "cli_cfg");
        assert_eq!(client.credentials().app_secret, "cfg-secret");
    }
}
