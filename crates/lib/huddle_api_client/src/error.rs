//! API client error types.

use huddle_core::models::ValidationError;
use huddle_core::session::SessionError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Convenience alias for client return types.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by [`ApiClient`](crate::ApiClient).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not complete (connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server's error text when present,
    /// otherwise the HTTP status text.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// The server rejected the session and it could not be refreshed.
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.0)
    }
}

/// Error body shapes the API is known to send.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Build an [`ApiError::Api`] from a failed response.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let server_message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.trim().is_empty());

        let message = server_message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_owned)
                .unwrap_or_else(|| status.as_str().to_owned())
        });

        ApiError::Api { status, message }
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// `true` when the user has to authenticate again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
            || self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
