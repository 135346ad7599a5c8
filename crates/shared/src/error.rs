use serde::{Deserialize, Serialize};

/// Error body returned by the backend (`{"detail": "..."}`).
///
/// Validation failures carry a list of field errors instead of a string, so
/// `detail` stays untyped and [`ApiErrorBody::message`] flattens it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ApiErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: serde_json::Value::String(detail.into()),
        }
    }

    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            serde_json::Value::Array(items) if !items.is_empty() => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                    .map(str::to_string)
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("; "))
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    PayloadTooLarge,
    Internal,
    Other,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ErrorCode::NotFound,
            400 | 422 => ErrorCode::Validation,
            413 => ErrorCode::PayloadTooLarge,
            500..=599 => ErrorCode::Internal,
            _ => ErrorCode::Other,
        }
    }
}
