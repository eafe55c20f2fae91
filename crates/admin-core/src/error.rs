//! Error Types
//!
//! `ApiError` is what every API call returns. `AuthError` is the outcome of a
//! failed token refresh; it is `Clone` because one refresh failure is handed to
//! every request waiting on it.

use serde::Deserialize;
use thiserror::Error;

/// Common result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Session-ending refresh failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no refresh token stored")]
    NoRefreshToken,
    #[error("refresh rejected by server ({status})")]
    RefreshRejected { status: u16 },
    #[error("refresh failed: {0}")]
    RefreshFailed(String),
    #[error("refresh abandoned before it settled")]
    RefreshAbandoned,
}

/// Errors surfaced to callers of the API client
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("API error ({status}): {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build a status error from a non-success response body.
    ///
    /// Understands the `{ success: false, error: { code, message } }` envelope
    /// and falls back to the raw body text.
    pub fn from_status(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: ErrorBody,
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            code: Option<String>,
            message: String,
        }

        match serde_json::from_str::<Envelope>(body) {
            Ok(envelope) => ApiError::Status {
                status,
                code: envelope.error.code,
                message: envelope.error.message,
            },
            Err(_) => ApiError::Status {
                status,
                code: None,
                message: body.to_string(),
            },
        }
    }

    /// True when the session is gone and the user has to sign in again
    pub fn is_session_lost(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Auth(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
