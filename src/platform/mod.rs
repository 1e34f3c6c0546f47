//! Feishu open platform client
//!
//! - `client`: credentials, application token cache and the REST calls
//! - `envelope`: `{code, msg, ...}` response checking
//! - `authorize`: authorization URL building and redirect parsing
//! - `upload`: multipart form for Drive uploads

pub mod authorize;
pub mod client;
pub mod envelope;
pub mod upload;

pub use authorize::{parse_callback, AuthorizationRequest};
pub use client::{Credentials, PlatformAuthClient, DEFAULT_BASE_URL};
pub use upload::UploadRequest;
