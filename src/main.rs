//! feishu-drive - Feishu OAuth and Drive upload CLI
//!
#![doc = "Main entry point for the feishu-drive command line tool."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use feishu_drive::cli::{Cli, Commands};
use feishu_drive::commands;
use feishu_drive::commands::publish::{CodeSource, PublishArgs};
use feishu_drive::commands::upload::UploadArgs;
use feishu_drive::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::AppToken => {
            let token = commands::auth::app_token(&config).await?;
            println!("{token}");
            Ok(())
        }
        Commands::AuthUrl { redirect_uri, raw } => {
            let url = commands::auth::auth_url(&config, redirect_uri, raw)?;
            println!("{url}");
            Ok(())
        }
        Commands::Callback { url } => {
            let code = commands::auth::callback_code(&config, &url)?;
            println!("{code}");
            Ok(())
        }
        Commands::Exchange { code } => {
            let bundle = commands::auth::exchange(&config, &code).await?;
            println!("{}", commands::render_json(&bundle)?);
            Ok(())
        }
        Commands::Refresh { refresh_token } => {
            let bundle = commands::auth::refresh(&config, &refresh_token).await?;
            println!("{}", commands::render_json(&bundle)?);
            Ok(())
        }
        Commands::Upload {
            file,
            user_token,
            parent_node,
            content_type,
        } => {
            let args = UploadArgs {
                file: &file,
                user_token: &user_token,
                parent_node,
                content_type,
            };
            let result = commands::upload::run_upload(&config, args).await?;
            println!("{}", commands::render_json(&result)?);
            Ok(())
        }
        Commands::Publish {
            file,
            code,
            callback_url,
            parent_node,
            content_type,
        } => {
            let source = match (code, callback_url) {
                (Some(code), _) => CodeSource::Code(code),
                (None, Some(url)) => CodeSource::CallbackUrl(url),
                (None, None) => anyhow::bail!("publish needs --code or --callback-url"),
            };
            let args = PublishArgs {
                file: &file,
                source,
                parent_node,
                content_type,
            };
            let result = commands::publish::run_publish(&config, args).await?;
            println!("{}", commands::render_json(&result)?);
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "feishu_drive=debug"
    } else {
        "feishu_drive=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
