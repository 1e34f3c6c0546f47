//! Feishu response envelope handling
//!
//! Every open-platform endpoint answers with a JSON object of the form
//! `{"code": <int>, "msg": <string>, ...}`. A `code` of `0` means success and
//! the remaining fields are the payload; anything else is an application
//! level failure whose full body is handed back to the caller.

use serde_json::Value;

use crate::error::{FeishuError, Result};

/// Checks the `code` field of a decoded response.
///
/// Returns the body unchanged on success. A missing or non-integer `code` is
/// treated as a failure, reported with `code: None`.
///
/// # Examples
///
/// ```
/// use feishu_drive::platform::envelope::into_payload;
///
/// let body = serde_json::json!({"code": 0, "data": {"file_token": "boxcn"}});
/// let payload = into_payload(body).unwrap();
/// assert_eq!(payload["data"]["file_token"], "boxcn");
///
/// let failed = serde_json::json!({"code": 1061002, "msg": "params error"});
/// assert!(into_payload(failed).is_err());
/// ```
pub fn into_payload(body: Value) -> Result<Value> {
    let code = body.get("code").and_then(Value::as_i64);
    if code == Some(0) {
        return Ok(body);
    }

    let msg = body.get("msg").and_then(Value::as_str).map(str::to_string);
    Err(FeishuError::RemoteApi { code, msg, body }.into())
}

/// Extracts the `data` payload from a successful envelope.
///
/// A success envelope without `data` yields `Value::Null`.
pub fn data_field(mut body: Value) -> Value {
    body.get_mut("data").map(Value::take).unwrap_or(Value::Null)
}
