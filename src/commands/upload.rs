//! Upload command

use std::path::Path;

use serde_json::Value;

use crate::config::Config;
use crate::error::{FeishuError, Result};
use crate::platform::upload::DEFAULT_CONTENT_TYPE;
use crate::platform::{PlatformAuthClient, UploadRequest};

/// Options for a single upload, as given on the command line.
#[derive(Debug, Clone)]
pub struct UploadArgs<'a> {
    pub file: &'a Path,
    pub user_token: &'a str,
    pub parent_node: Option<String>,
    pub content_type: Option<String>,
}

/// Reads `args.file` and uploads it with the given user access token.
///
/// The folder comes from `--parent-node`, falling back to the configured
/// `parent_node`. The MIME type falls back to a guess from the extension.
///
/// # Errors
///
/// Returns [`FeishuError::Io`] if the file cannot be read, otherwise the
/// errors of [`PlatformAuthClient::upload`].
pub async fn run_upload(config: &Config, args: UploadArgs<'_>) -> Result<Value> {
    let request =
        read_upload_request(config, args.file, args.parent_node, args.content_type).await?;

    let client = PlatformAuthClient::from_config(&config.feishu)?;
    client.upload(request, args.user_token).await
}

/// Reads `file` into an [`UploadRequest`], resolving the folder and MIME
/// type against configuration.
pub(crate) async fn read_upload_request(
    config: &Config,
    file: &Path,
    parent_node: Option<String>,
    content_type: Option<String>,
) -> Result<UploadRequest> {
    let bytes = tokio::fs::read(file).await.map_err(FeishuError::Io)?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| FeishuError::Config(format!("not a file path: {}", file.display())))?;

    let content_type = content_type.unwrap_or_else(|| content_type_for(file).to_string());

    let mut request = UploadRequest::new(file_name, bytes).content_type(content_type);
    if let Some(node) = parent_node.or_else(|| config.feishu.parent_node.clone()) {
        request = request.parent_node(node);
    }

    tracing::info!(
        "Uploading {} ({} bytes)",
        request.file_name,
        request.size()
    );
    Ok(request)
}

/// Guesses a MIME type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("md" | "markdown") => "text/markdown",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for(Path::new("a.md")), "text/markdown");
        assert_eq!(content_type_for(Path::new("A.MD")), "text/markdown");
        assert_eq!(content_type_for(Path::new("b.txt")), "text/plain");
        assert_eq!(content_type_for(Path::new("c.jpeg")), "image/jpeg");
    }

    #[test]
    fn test_content_type_for_unknown_extension() {
        assert_eq!(
            content_type_for(Path::new("archive.tar.zst")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("Makefile")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_run_upload_missing_file_is_io_error() {
        let config = Config::default();
        let args = UploadArgs {
            file: Path::new("/nonexistent/feishu/notes.md"),
            user_token: "u-1",
            parent_node: None,
            content_type: None,
        };
        let err = run_upload(&config, args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FeishuError>(),
            Some(FeishuError::Io(_))
        ));
    }
}
