/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `auth`    — Application token, authorization URL, code exchange and refresh
- `upload`  — Upload a local file to Drive
- `publish` — Exchange an authorization code and upload in one run

Handlers return what they produced so the entrypoint decides how to print
it; they build a fresh [`PlatformAuthClient`](crate::platform::PlatformAuthClient)
from configuration on every invocation.
*/

pub mod auth;
pub mod publish;
pub mod upload;

use serde_json::Value;

use crate::error::{FeishuError, Result};

/// Renders a command result as pretty-printed JSON.
pub fn render_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| FeishuError::Serialization(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_is_pretty() {
        let rendered = render_json(&serde_json::json!({"file_token": "boxcn"})).unwrap();
        assert_eq!(rendered, "{\n  \"file_token\": \"boxcn\"\n}");
    }
}
