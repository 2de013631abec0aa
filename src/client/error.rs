//! Mapping of non-2xx responses onto [`Error::Api`].

use serde::Deserialize;
use serde_json::Value;

use crate::Error;

/// FastAPI error body: `detail` is a string, a list of validation errors, or
/// an arbitrary object.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub detail: Value,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<String> {
        detail_message(&self.detail)
    }

    pub fn into_error(self, status: u16) -> Error {
        let message = self
            .message()
            .unwrap_or_else(|| fallback_message(status));
        Error::Api { status, message }
    }
}

/// Builds the error for a failed response from its status and raw body.
pub(crate) fn api_error(status: reqwest::StatusCode, body: &[u8]) -> Error {
    let code = status.as_u16();

    if let Ok(parsed) = serde_json::from_slice::<ErrorResponse>(body) {
        return parsed.into_error(code);
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    let message = if text.is_empty() || text.starts_with('<') {
        fallback_message(code)
    } else {
        text.to_string()
    };
    Error::Api {
        status: code,
        message,
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(validation_message).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(detail.to_string())),
        _ => None,
    }
}

/// `{"loc": ["body", "email"], "msg": "field required"}` -> `email: field required`
fn validation_message(item: &Value) -> Option<String> {
    let msg = match item {
        Value::String(s) => return Some(s.clone()),
        Value::Object(map) => map.get("msg").and_then(Value::as_str)?,
        _ => return None,
    };

    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.last())
        .map(|last| match last {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

    Some(match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_string(),
    })
}

fn fallback_message(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
