//! HTTP-facing error type.
//!
//! Every handler returns `Result<_, ApiError>`. The response is always a JSON
//! object `{"error": "..."}` with the matching status; internal failures are
//! logged with their detail and reported to the client generically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::services::auth::AuthError;
use crate::services::score::ScoreError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const NOT_LOGGED_IN_MESSAGE: &str = "Not logged in";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn not_logged_in() -> Self {
        Self::Unauthorized(NOT_LOGGED_IN_MESSAGE.to_owned())
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Internal detail never leaves the server.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        }
        let body = serde_json::json!({ "error": self.public_message() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(_) | AuthError::PasswordMismatch => Self::Validation(err.to_string()),
            AuthError::UsernameTaken | AuthError::EmailTaken => Self::Conflict(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Password(_) | AuthError::Worker(_) | AuthError::Database(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<ScoreError> for ApiError {
    fn from(err: ScoreError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
