//! Custom error types and handling
//!
//! This module defines the application's error types and implements
//! conversion to HTTP responses for the Axum framework.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A single field-level validation failure.
///
/// Validators return these in the order the fields were checked, so the
/// caller can correct input field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Lifecycle errors: well-formed requests that violate an invariant
    // (structural edit after publish, publishing an empty assignment)
    #[error("Rejected mutation: {0}")]
    RejectedMutation(String),

    // Collaborator errors
    #[error("Grading service unavailable")]
    GradingUnavailable,

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Build a validation error for a single field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(field, reason)])
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RejectedMutation(_) => "REJECTED_MUTATION",
            Self::GradingUnavailable => "GRADING_UNAVAILABLE",
            Self::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidToken | Self::TokenExpired | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RejectedMutation(_) => StatusCode::CONFLICT,
            Self::GradingUnavailable => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Database(_) | Self::Internal(_) | Self::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let (message, details) = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                ("An internal error occurred".to_string(), None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("A database error occurred".to_string(), None)
            }
            AppError::Validation(violations) => (
                self.to_string(),
                serde_json::to_value(violations).ok(),
            ),
            _ => (self.to_string(), None),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

// Implement From for common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::PoolTimedOut => {
                AppError::UpstreamTimeout("database pool timed out".to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let reason = errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid value".to_string());
                FieldViolation::new(field.to_string(), reason)
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(violations)
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::RejectedMutation("published".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::GradingUnavailable.status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::UpstreamTimeout("grading".into()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::NotFound("assignment".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::RejectedMutation("x".into()).error_code(),
            "REJECTED_MUTATION"
        );
        assert_eq!(AppError::GradingUnavailable.error_code(), "GRADING_UNAVAILABLE");
    }
}
