//! Authorization URL construction and OAuth redirect parsing
//!
//! The Feishu web authorization page lives at `/open-apis/authen/v1/index`.
//! After the user consents, the browser is redirected to `redirect_uri` with
//! `code` and `state` appended as query parameters.
//!
//! [`PlatformAuthClient::get_oauth_url`](super::client::PlatformAuthClient::get_oauth_url)
//! formats the URL without any encoding. [`AuthorizationRequest`] is the
//! encoded alternative and also carries `scope` and `state`.

use url::Url;

use crate::error::{FeishuError, Result};

/// Path of the web authorization page.
pub const AUTHORIZE_PATH: &str = "/open-apis/authen/v1/index";

/// Parameters for the encoded authorization URL.
///
/// # Examples
///
/// ```
/// use feishu_drive::platform::authorize::AuthorizationRequest;
///
/// let request = AuthorizationRequest {
///     redirect_uri: "https://example.com/cb?from=cli".to_string(),
///     scope: Some("drive:file:upload offline_access".to_string()),
///     state: Some("xyz".to_string()),
/// };
///
/// let url = request.url("https://open.feishu.cn", "cli_123").unwrap();
/// assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fcb%3Ffrom%3Dcli"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Where the platform sends the browser after consent.
    pub redirect_uri: String,

    /// Space-separated scopes to request.
    pub scope: Option<String>,

    /// Opaque value echoed back on the redirect, used against CSRF.
    pub state: Option<String>,
}

impl AuthorizationRequest {
    /// Builds the authorization URL with all values percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`FeishuError::Config`] if `base_url` is not a valid URL.
    pub fn url(&self, base_url: &str, app_id: &str) -> Result<String> {
        let mut url = Url::parse(base_url)
            .and_then(|base| base.join(AUTHORIZE_PATH))
            .map_err(|e| FeishuError::Config(format!("invalid base URL {base_url}: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("app_id", app_id);
            query.append_pair("redirect_uri", &self.redirect_uri);
            if let Some(scope) = &self.scope {
                query.append_pair("scope", scope);
            }
            if let Some(state) = &self.state {
                query.append_pair("state", state);
            }
        }

        Ok(url.to_string())
    }
}

/// Extracts the authorization `code` from the URL the browser was redirected
/// to.
///
/// When `expected_state` is given, the `state` query parameter must be
/// present and equal to it.
///
/// # Errors
///
/// Returns [`FeishuError::Callback`] if the URL does not parse, the state
/// does not match, or the `code` parameter is missing or empty.
///
/// # Examples
///
/// ```
/// use feishu_drive::platform::authorize::parse_callback;
///
/// let code = parse_callback(
///     "https://open.feishu.cn/api-explorer/loading?code=abc&state=RANDOMSTRING",
///     Some("RANDOMSTRING"),
/// )
/// .unwrap();
/// assert_eq!(code, "abc");
/// ```
pub fn parse_callback(callback_url: &str, expected_state: Option<&str>) -> Result<String> {
    let url = Url::parse(callback_url)
        .map_err(|e| FeishuError::Callback(format!("invalid callback URL: {e}")))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(expected) = expected_state {
        if state.as_deref() != Some(expected) {
            return Err(FeishuError::Callback("state mismatch in OAuth callback".to_string()).into());
        }
    }

    code.filter(|c| !c.is_empty()).ok_or_else(|| {
        FeishuError::Callback("authorization code missing from callback".to_string()).into()
    })
}
