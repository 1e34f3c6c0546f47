//! Multipart form for the Drive `upload_all` endpoint

use reqwest::multipart::{Form, Part};

use crate::error::{FeishuError, Result};

/// Path of the single-shot upload endpoint.
pub const UPLOAD_PATH: &str = "/open-apis/drive/v1/files/upload_all";

/// Parent type for uploads into a user's Drive folder.
pub const DEFAULT_PARENT_TYPE: &str = "explorer";

/// MIME type sent for the file part unless overridden.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file to upload together with its Drive placement.
///
/// # Examples
///
/// ```
/// use feishu_drive::platform::upload::UploadRequest;
///
/// let request = UploadRequest::new("notes.md", b"# Notes".to_vec())
///     .parent_node("fldcnXXXX")
///     .content_type("text/markdown");
///
/// assert_eq!(request.size(), 7);
/// assert_eq!(request.parent_node.as_deref(), Some("fldcnXXXX"));
/// ```
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub parent_type: String,
    /// Folder token; omitted from the form when `None` or empty.
    pub parent_node: Option<String>,
    pub content_type: String,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            parent_type: DEFAULT_PARENT_TYPE.to_string(),
            parent_node: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    pub fn parent_node(mut self, parent_node: impl Into<String>) -> Self {
        self.parent_node = Some(parent_node.into());
        self
    }

    pub fn parent_type(mut self, parent_type: impl Into<String>) -> Self {
        self.parent_type = parent_type.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Size of the payload in bytes, as reported in the `size` field.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Text fields sent ahead of the file part, in order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("file_name", self.file_name.clone()),
            ("parent_type", self.parent_type.clone()),
        ];
        if let Some(node) = self.parent_node.as_deref().filter(|n| !n.is_empty()) {
            fields.push(("parent_node", node.to_string()));
        }
        fields.push(("size", self.size().to_string()));
        fields
    }

    /// Builds the multipart form. The file bytes go in the part named `file`.
    ///
    /// # Errors
    ///
    /// Fails if `content_type` is not a valid MIME string.
    pub fn into_form(self) -> Result<Form> {
        let form = self
            .text_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(FeishuError::Http)?;

        Ok(form.part("file", part))
    }
}
