//! Configuration management for feishu-drive
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{FeishuError, Result};
use crate::platform::client::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for feishu-drive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feishu application and OAuth settings
    #[serde(default)]
    pub feishu: FeishuConfig,
}

/// Feishu application configuration
///
/// Credentials come from the developer console of a self-built app. The
/// OAuth defaults match the API explorer redirect that every app may use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeishuConfig {
    /// Open platform base URL (override for tests and private deployments)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Application ID (`cli_...`)
    #[serde(default)]
    pub app_id: String,

    /// Application secret
    #[serde(default)]
    pub app_secret: String,

    /// Redirect URI registered for the app
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Space-separated scopes requested on authorization
    #[serde(default = "default_scope")]
    pub scope: String,

    /// State value sent with the authorization request and checked on callback
    #[serde(default = "default_state")]
    pub state: String,

    /// Drive folder token that uploads land in
    #[serde(default)]
    pub parent_node: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_redirect_uri() -> String {
    "https://open.feishu.cn/api-explorer/loading".to_string()
}

fn default_scope() -> String {
    "drive:file:upload offline_access".to_string()
}

fn default_state() -> String {
    "RANDOMSTRING".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for FeishuConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_id: String::new(),
            app_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            scope: default_scope(),
            state: default_state(),
            parent_node: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used and the
    /// environment is expected to supply credentials.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, for overrides
    ///
    /// # Errors
    ///
    /// Returns [`FeishuError::Config`] if the file exists but cannot be read,
    /// or [`FeishuError::Yaml`] if it cannot be parsed.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FeishuError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents).map_err(|e| FeishuError::Yaml(e).into())
    }

    fn apply_env_vars(&mut self) {
        let feishu = &mut self.feishu;

        if let Ok(base_url) = std::env::var("FEISHU_BASE_URL") {
            feishu.base_url = base_url;
        }

        if let Ok(app_id) = std::env::var("FEISHU_APP_ID") {
            feishu.app_id = app_id;
        }

        if let Ok(app_secret) = std::env::var("FEISHU_APP_SECRET") {
            feishu.app_secret = app_secret;
        }

        if let Ok(redirect_uri) = std::env::var("FEISHU_REDIRECT_URI") {
            feishu.redirect_uri = redirect_uri;
        }

        if let Ok(scope) = std::env::var("FEISHU_SCOPE") {
            feishu.scope = scope;
        }

        if let Ok(state) = std::env::var("FEISHU_STATE") {
            feishu.state = state;
        }

        if let Ok(parent_node) = std::env::var("FEISHU_PARENT_NODE") {
            feishu.parent_node = Some(parent_node).filter(|n| !n.is_empty());
        }

        if let Ok(timeout) = std::env::var("FEISHU_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                feishu.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid FEISHU_TIMEOUT_SECONDS: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.feishu.base_url = base_url.clone();
        }

        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`FeishuError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let feishu = &self.feishu;

        if feishu.app_id.is_empty() {
            return Err(FeishuError::Config(
                "feishu.app_id cannot be empty (set it in the config file or FEISHU_APP_ID)"
                    .to_string(),
            )
            .into());
        }

        if feishu.app_secret.is_empty() {
            return Err(FeishuError::Config(
                "feishu.app_secret cannot be empty (set it in the config file or FEISHU_APP_SECRET)"
                    .to_string(),
            )
            .into());
        }

        if let Err(e) = url::Url::parse(&feishu.base_url) {
            return Err(FeishuError::Config(format!(
                "feishu.base_url is not a valid URL ({}): {}",
                feishu.base_url, e
            ))
            .into());
        }

        if feishu.timeout_seconds == 0 {
            return Err(FeishuError::Config(
                "feishu.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use serial_test::serial;

    const ENV_KEYS: [&str; 8] = [
        "FEISHU_BASE_URL",
        "FEISHU_APP_ID",
        "FEISHU_APP_SECRET",
        "FEISHU_REDIRECT_URI",
        "FEISHU_SCOPE",
        "FEISHU_STATE",
        "FEISHU_PARENT_NODE",
        "FEISHU_TIMEOUT_SECONDS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.feishu.app_id = "cli_a1".to_string();
        config.feishu.app_secret = "secret".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.feishu.base_url, "https://open.feishu.cn");
        assert_eq!(
            config.feishu.redirect_uri,
            "https://open.feishu.cn/api-explorer/loading"
        );
        assert_eq!(config.feishu.scope, "drive:file:upload offline_access");
        assert_eq!(config.feishu.state, "RANDOMSTRING");
        assert_eq!(config.feishu.timeout_seconds, 30);
        assert!(config.feishu.parent_node.is_none());
    }

    #[test]
    fn test_config_validation_success() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_app_id() {
        let mut config = valid_config();
        config.feishu.app_id = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("app_id"));
    }

    #[test]
    fn test_config_validation_empty_app_secret() {
        let mut config = valid_config();
        config.feishu.app_secret = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("app_secret"));
    }

    #[test]
    fn test_config_validation_invalid_base_url() {
        let mut config = valid_config();
        config.feishu.base_url = "open.feishu.cn".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = valid_config();
        config.feishu.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
feishu:
  app_id: cli_yaml
  app_secret: yaml-secret
  parent_node: fldcnABC
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.feishu.app_id, "cli_yaml");
        assert_eq!(config.feishu.parent_node.as_deref(), Some("fldcnABC"));
        assert_eq!(config.feishu.base_url, "https://open.feishu.cn");
        assert_eq!(config.feishu.state, "RANDOMSTRING");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "feishu:\n  app_id: cli_file\n  app_secret: file-secret\n  timeout_seconds: 5\n",
        )
        .unwrap();

        let config = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap();
        assert_eq!(config.feishu.app_id, "cli_file");
        assert_eq!(config.feishu.timeout_seconds, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        clear_env();
        let config = Config::load("/nonexistent/feishu/config.yaml", &Cli::default()).unwrap();
        assert_eq!(config.feishu.base_url, "https://open.feishu.cn");
        assert!(config.feishu.app_id.is_empty());
    }

    #[test]
    #[serial]
    fn test_load_invalid_yaml_is_yaml_error() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "feishu: [not, a, map").unwrap();

        let err = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FeishuError>(),
            Some(FeishuError::Yaml(_))
        ));
        assert!(err.to_string().starts_with("YAML error:"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "feishu:\n  app_id: cli_file\n  app_secret: s\n").unwrap();

        std::env::set_var("FEISHU_APP_ID", "cli_env");
        std::env::set_var("FEISHU_PARENT_NODE", "fld_env");
        std::env::set_var("FEISHU_TIMEOUT_SECONDS", "12");
        let config = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap();
        clear_env();

        assert_eq!(config.feishu.app_id, "cli_env");
        assert_eq!(config.feishu.app_secret, "s");
        assert_eq!(config.feishu.parent_node.as_deref(), Some("fld_env"));
        assert_eq!(config.feishu.timeout_seconds, 12);
    }

    #[test]
    #[serial]
    fn test_invalid_env_timeout_is_ignored() {
        clear_env();
        std::env::set_var("FEISHU_TIMEOUT_SECONDS", "soon");
        let config = Config::load("/nonexistent/config.yaml", &Cli::default()).unwrap();
        clear_env();
        assert_eq!(config.feishu.timeout_seconds, 30);
    }

    #[test]
    #[serial]
    fn test_cli_base_url_overrides_env() {
        clear_env();
        std::env::set_var("FEISHU_BASE_URL", "http://from-env");
        let cli = Cli {
            base_url: Some("http://from-cli".to_string()),
            ..Cli::default()
        };
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        clear_env();
        assert_eq!(config.feishu.base_url, "http://from-cli");
    }
}
