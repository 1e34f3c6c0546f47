//! Token commands: application token, authorization URL, code exchange,
//! refresh and callback parsing

use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::platform::{parse_callback, AuthorizationRequest, PlatformAuthClient};

/// Fetches a fresh application access token.
///
/// # Examples
///
/// ```no_run
/// use feishu_drive::config::Config;
/// use feishu_drive::commands::auth::app_token;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load("config/config.yaml", &Default::default())?;
/// let token = app_token(&config).await?;
/// println!("{token}");
/// # Ok(())
/// # }
/// ```
pub async fn app_token(config: &Config) -> Result<String> {
    let mut client = PlatformAuthClient::from_config(&config.feishu)?;
    tracing::info!("Requesting app access token for {}", config.feishu.app_id);
    client.get_app_access_token().await
}

/// Builds the authorization URL.
///
/// With `raw` set the URL is formatted verbatim from the redirect URI, with
/// no scope or state. Otherwise every parameter is percent-encoded and the
/// configured scope and state are included.
pub fn auth_url(config: &Config, redirect_uri: Option<String>, raw: bool) -> Result<String> {
    let redirect_uri = redirect_uri.unwrap_or_else(|| config.feishu.redirect_uri.clone());

    if raw {
        let client = PlatformAuthClient::from_config(&config.feishu)?;
        return Ok(client.get_oauth_url(&redirect_uri));
    }

    let request = AuthorizationRequest {
        redirect_uri,
        scope: Some(config.feishu.scope.clone()).filter(|s| !s.is_empty()),
        state: Some(config.feishu.state.clone()).filter(|s| !s.is_empty()),
    };
    request.url(&config.feishu.base_url, &config.feishu.app_id)
}

/// Extracts the authorization code from a redirect URL, checking the
/// configured state.
pub fn callback_code(config: &Config, callback_url: &str) -> Result<String> {
    let expected = Some(config.feishu.state.as_str()).filter(|s| !s.is_empty());
    parse_callback(callback_url, expected)
}

/// Exchanges an authorization code for a user token bundle.
pub async fn exchange(config: &Config, code: &str) -> Result<Value> {
    let mut client = PlatformAuthClient::from_config(&config.feishu)?;
    tracing::info!("Exchanging authorization code for user access token");
    client.get_user_access_token(code).await
}

/// Refreshes a user token bundle.
pub async fn refresh(config: &Config, refresh_token: &str) -> Result<Value> {
    let mut client = PlatformAuthClient::from_config(&config.feishu)?;
    tracing::info!("Refreshing user access token");
    client.refresh_user_access_token(refresh_token).await
}
