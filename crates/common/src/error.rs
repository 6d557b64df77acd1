//! Error types for lunchvote.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A write would break a uniqueness rule (one menu per restaurant and
    /// day, one vote per employee and day, unique usernames).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Voting for the day has been closed by finalizing its result.
    #[error("Voting closed: {0}")]
    VotingClosed(String),

    /// A write conflicts with a voting rule (date mismatch, date change).
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    // === Server Errors ===
    /// Stored state contradicts an engine invariant. Never auto-corrected.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::VotingClosed(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::PolicyViolation(_) => StatusCode::BAD_REQUEST,
            Self::ConstraintViolation(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::InvariantViolation(_)
            | Self::Database(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::VotingClosed(_) => "VOTING_CLOSED",
            Self::PolicyViolation(_) => "POLICY_VIOLATION",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_errors_are_client_errors() {
        let closed = AppError::VotingClosed("2024-05-01".to_string());
        assert_eq!(closed.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(closed.error_code(), "VOTING_CLOSED");
        assert!(!closed.is_server_error());

        let mismatch = AppError::PolicyViolation("date mismatch".to_string());
        assert_eq!(mismatch.status_code(), StatusCode::BAD_REQUEST);
        assert!(!mismatch.is_server_error());
    }

    #[test]
    fn test_constraint_violation_is_conflict() {
        let err = AppError::ConstraintViolation("already voted".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "CONSTRAINT_VIOLATION");
    }

    #[test]
    fn test_invariant_violation_is_server_error() {
        let err = AppError::InvariantViolation("negative vote count".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
        assert!(err.to_string().contains("negative vote count"));
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::NotFound("menu".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
