//! feishu-drive - Feishu open platform OAuth and Drive upload client
//!
//! This library wraps the Feishu REST endpoints needed to authenticate an
//! application, obtain and refresh a user access token through OAuth, and
//! upload a file into the user's Drive.
//!
//! # Architecture
//!
//! - `platform`: the HTTP client, response envelope, authorization helpers
//!   and upload form
//! - `commands`: handlers behind the CLI subcommands
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use feishu_drive::PlatformAuthClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut client = PlatformAuthClient::default();
//!     client.set_credentials("cli_xxx", "app-secret");
//!
//!     println!("{}", client.get_oauth_url("https://example.com/callback"));
//!     let bundle = client.get_user_access_token("code-from-redirect").await?;
//!     let user_token = bundle["access_token"].as_str().unwrap_or_default();
//!
//!     client
//!         .upload_file(b"# hello".to_vec(), "hello.md", user_token)
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod platform;

// Re-export commonly used types
pub use config::{Config, FeishuConfig};
pub use error::{FeishuError, Result};
pub use platform::{AuthorizationRequest, Credentials, PlatformAuthClient, UploadRequest};
