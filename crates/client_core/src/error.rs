//! Client-side error modeling.

use shared::error::{ApiErrorBody, ErrorCode};
use thiserror::Error;

use crate::upload::UploadRejection;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("api error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("upload rejected: {0}")]
    Upload(#[from] UploadRejection),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("websocket error: {0}")]
    WebSocket(String),
}

impl ClientError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { status, .. } => Some(ErrorCode::from_status(*status)),
            _ => None,
        }
    }

    /// Server-provided detail when there is one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ClientError::Upload(rejection) => rejection.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Turns a non-success response into [`ClientError::Api`], keeping the
/// backend's `detail` string when the body carries one.
pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
        });
    Err(ClientError::Api {
        status: status.as_u16(),
        detail,
    })
}
