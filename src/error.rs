//! Error types for feishu-drive
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for feishu-drive operations
///
/// Transport failures (connection errors, timeouts, bodies that are not
/// JSON) surface as [`FeishuError::Http`]. Responses that decode fine but
/// carry a non-zero `code` surface as [`FeishuError::RemoteApi`] with the
/// whole body attached.
#[derive(Error, Debug)]
pub enum FeishuError {
    /// The platform answered with a non-zero (or missing) `code`
    #[error("Remote API error (code {code:?}): {body}")]
    RemoteApi {
        /// Value of the `code` field, `None` when absent or not an integer
        code: Option<i64>,
        /// Value of the `msg` field, if the platform sent one
        msg: Option<String>,
        /// The full decoded response body
        body: serde_json::Value,
    },

    /// A success envelope lacked a field the operation needs
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// OAuth redirect callback could not be interpreted
    #[error("OAuth callback error: {0}")]
    Callback(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors, including undecodable response bodies
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl FeishuError {
    /// Returns the platform `code` for remote API errors.
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            FeishuError::RemoteApi { code, .. } => *code,
            _ => None,
        }
    }
}

/// Result type alias for feishu-drive operations
///
/// Uses `anyhow::Error` so context can be attached while propagating;
/// callers that need the error kind downcast to [`FeishuError`].
pub type Result<T> = anyhow::Result<T>;
