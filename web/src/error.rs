//! Error types for web handlers.
//!
//! [`AppError`] carries an HTTP status and a user-facing message, and renders
//! as `{"success": false, "message": ...}`. Domain errors convert into it
//! with `?`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cowork_core::BookingError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Machine-readable error code, logged but not sent
    code: &'static str,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: &'static str) -> Self {
        Self {
            status,
            message,
            code,
        }
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), "BAD_REQUEST")
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into(), "UNAUTHORIZED")
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// The HTTP status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let (status, code) = match &err {
            BookingError::VenueNotFound(_)
            | BookingError::ReservationNotFound(_)
            | BookingError::UserNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            BookingError::Forbidden { .. } | BookingError::AdminRequired { .. } => {
                (StatusCode::FORBIDDEN, "FORBIDDEN")
            }
            BookingError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            BookingError::QuotaExceeded { .. } => (StatusCode::BAD_REQUEST, "QUOTA_EXCEEDED"),
            BookingError::OutOfHours(_) => (StatusCode::BAD_REQUEST, "OUT_OF_HOURS"),
            BookingError::InvalidRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_RANGE"),
            BookingError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            BookingError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            BookingError::Storage(_) | BookingError::Credential(_) => {
                tracing::error!(error = %err, "Internal failure");
                return Self::internal("An internal error occurred");
            }
        };
        Self::new(status, err.to_string(), code)
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = %self.code,
                message = %self.message,
                "Internal server error"
            );
        } else {
            tracing::debug!(status = %self.status, code = %self.code, "Request rejected");
        }

        let body = ErrorResponse {
            success: false,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}
