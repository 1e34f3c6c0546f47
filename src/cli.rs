//! Command-line interface definition for feishu-drive
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the OAuth token dance and Drive uploads.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// feishu-drive - Feishu OAuth and Drive upload client
///
/// Obtain application and user access tokens from the Feishu open
/// platform and upload files into a user's Drive.
#[derive(Parser, Debug, Clone)]
#[command(name = "feishu-drive")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the open platform base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for feishu-drive
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fetch an application access token
    AppToken,

    /// Print the authorization URL to open in a browser
    AuthUrl {
        /// Redirect URI (defaults to the configured one)
        #[arg(short, long)]
        redirect_uri: Option<String>,

        /// Print the unencoded form without scope and state
        #[arg(long)]
        raw: bool,
    },

    /// Parse the authorization code out of a redirect URL
    Callback {
        /// Full URL the browser was redirected to
        #[arg(short, long)]
        url: String,
    },

    /// Exchange an authorization code for a user access token
    Exchange {
        /// Authorization code from the redirect
        #[arg(long)]
        code: String,
    },

    /// Refresh a user access token
    Refresh {
        /// Refresh token from a previous exchange
        #[arg(long)]
        refresh_token: String,
    },

    /// Upload a local file to Drive
    Upload {
        /// File to upload
        #[arg(short, long)]
        file: PathBuf,

        /// User access token to upload with
        #[arg(long, env = "FEISHU_USER_ACCESS_TOKEN")]
        user_token: String,

        /// Destination folder token (defaults to the configured one)
        #[arg(long)]
        parent_node: Option<String>,

        /// MIME type of the file part
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Exchange an authorization code and upload a file with the user token
    Publish {
        /// File to upload
        #[arg(short, long)]
        file: PathBuf,

        /// Authorization code from the redirect
        #[arg(long, required_unless_present = "callback_url", conflicts_with = "callback_url")]
        code: Option<String>,

        /// Full redirect URL; the code is taken from it after checking state
        #[arg(long)]
        callback_url: Option<String>,

        /// Destination folder token (defaults to the configured one)
        #[arg(long)]
        parent_node: Option<String>,

        /// MIME type of the file part
        #[arg(long)]
        content_type: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            base_url: None,
            verbose: false,
            command: Commands::AppToken,
        }
    }
}
