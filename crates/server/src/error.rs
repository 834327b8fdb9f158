//! Unified error handling with Sentry integration.
//!
//! All route handlers return `Result<T, AppError>`. Every error becomes a JSON
//! body `{"error": "..."}`; server-side failures are logged and captured to
//! Sentry, and the client only sees a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use request_desk_core::{InvalidId, ListQueryError, PatchError, ValidationError};

use crate::db::RepositoryError;
use crate::services::AuthError;

/// Message returned for every 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Rejected partial update or enum value.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Path id that is not a number.
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    /// Login failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Body rejected before parsing, with the status the rejection chose.
    #[error("{message}")]
    Body { status: StatusCode, message: String },

    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ListQueryError> for AppError {
    fn from(err: ListQueryError) -> Self {
        match err {
            ListQueryError::Invalid(e) => Self::Validation(e),
            ListQueryError::Status(e) => Self::Patch(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Patch(_) | Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::Body { status, .. } => *status,
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) | Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Auth(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            _ if status.is_server_error() => INTERNAL_ERROR_MESSAGE.to_string(),
            Self::Database(RepositoryError::NotFound) => "not found".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::from(ValidationError::MissingFields(vec!["item"])).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(PatchError::EmptyPatch {
                allowed: "status".to_string()
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(InvalidId("abc".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("order 9".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::DataCorruption("x".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_client_errors_carry_message() {
        let (status, body) = body_of(ValidationError::MissingFields(vec!["item", "sector"]).into())
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required fields: item, sector");

        let (_, body) = body_of(AppError::NotFound("order 7".to_string())).await;
        assert_eq!(body["error"], "order 7 not found");

        let (status, body) = body_of(AppError::Body {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "request body too large".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "request body too large");
    }

    #[tokio::test]
    async fn test_server_errors_are_sanitized() {
        let (status, body) = body_of(AppError::from(RepositoryError::Conflict(
            "users_email_key on secret_table".to_string(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }
}
