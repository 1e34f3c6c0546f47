//! Publish command: authorization code to uploaded file in one run
//!
//! Mirrors the browser flow: the user authorizes, the redirect carries a
//! `code`, the code is exchanged for a user token (fetching the app token
//! first), and the file is uploaded with that user token.

use std::path::Path;

use serde_json::Value;

use crate::commands::auth::callback_code;
use crate::commands::upload::read_upload_request;
use crate::config::Config;
use crate::error::{FeishuError, Result};
use crate::platform::PlatformAuthClient;

/// Where the authorization code comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSource {
    /// A code copied out of the redirect.
    Code(String),
    /// The full redirect URL; its `state` is checked against configuration.
    CallbackUrl(String),
}

/// Options for a publish run, as given on the command line.
#[derive(Debug, Clone)]
pub struct PublishArgs<'a> {
    pub file: &'a Path,
    pub source: CodeSource,
    pub parent_node: Option<String>,
    pub content_type: Option<String>,
}

/// Exchanges the authorization code and uploads `args.file` with the
/// resulting user access token.
///
/// Returns the upload's `data` payload.
///
/// # Errors
///
/// - [`FeishuError::Callback`] if the redirect URL is invalid or its state
///   does not match.
/// - [`FeishuError::Io`] if the file cannot be read. This is checked before
///   any request is sent, so a bad path does not consume the code.
/// - [`FeishuError::MalformedResponse`] if the token bundle has no
///   `access_token`.
/// - Otherwise the errors of the token exchange and the upload.
pub async fn run_publish(config: &Config, args: PublishArgs<'_>) -> Result<Value> {
    let code = match args.source {
        CodeSource::Code(code) => code,
        CodeSource::CallbackUrl(url) => callback_code(config, &url)?,
    };

    let request =
        read_upload_request(config, args.file, args.parent_node, args.content_type).await?;

    let mut client = PlatformAuthClient::from_config(&config.feishu)?;
    tracing::info!("Exchanging authorization code for user access token");
    let bundle = client.get_user_access_token(&code).await?;
    let user_token = user_access_token(&bundle)?;

    client.upload(request, user_token).await
}

/// Pulls `access_token` out of a user token bundle.
fn user_access_token(bundle: &Value) -> Result<&str> {
    bundle
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            FeishuError::MalformedResponse("access_token missing from user token data".to_string())
                .into()
        })
}
