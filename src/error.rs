//! Error types for the story/user data layer.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by story, story-list and user operations.
#[derive(Error, Debug)]
pub enum SnoozeError {
    /// Network failure, timeout, or an unexpected non-success status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Credentials or session token rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The API (or the favorites workflow) rejected the submitted fields.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Response payload could not be mapped to the expected record shape.
    #[error("unexpected response format: {0}")]
    Format(String),

    /// The configured API base URL is unusable.
    #[error("invalid API url: {0}")]
    InvalidUrl(String),

    /// Local file I/O (stored credentials).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for data-layer operations.
pub type Result<T> = std::result::Result<T, SnoozeError>;

impl SnoozeError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Map a failed HTTP status and its body onto the taxonomy.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            }
        });
        match status.as_u16() {
            401 | 403 => Self::Auth(message),
            400 | 404 | 409 | 422 => Self::Validation(message),
            code => Self::Transport(format!("server returned {code}: {message}")),
        }
    }
}

impl From<reqwest::Error> for SnoozeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Format(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SnoozeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(err.to_string())
    }
}

// {"error": {"status": 401, "title": "Unauthorized", "message": "..."}}
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    title: Option<String>,
}

fn error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    envelope.error.message.or(envelope.error.title)
}
