//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Every distinguishable
//! failure has its own variant so callers and tests can branch without
//! string matching.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// A single boundary-validation failure, attributed to a request field
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request failed boundary validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Email already registered
    #[error("Email is already in use")]
    EmailTaken,

    /// Account not found
    #[error("Account not found")]
    AccountNotFound,

    /// Invalid credentials (unknown email or wrong password; deliberately
    /// indistinguishable to prevent account enumeration)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login attempted before the email was verified
    #[error("Please verify your email before logging in")]
    EmailNotVerified,

    /// Verification token does not exist
    #[error("Invalid verification token")]
    InvalidToken,

    /// Verification token was already consumed
    #[error("Verification token has already been used")]
    TokenAlreadyUsed,

    /// Verification token expired
    #[error("Verification token has expired")]
    TokenExpired,

    /// Email already verified (resend refused)
    #[error("Email is already verified")]
    AlreadyVerified,

    /// Resend refused while the cooldown window is open
    #[error("Too many resend attempts, retry in {wait_ms} ms")]
    ResendThrottled { wait_ms: i64 },

    /// Terminal lockout after exhausting the resend allowance
    #[error("Account is blocked from resending verification emails")]
    EmailBlocked,

    /// Outbound email dispatch failed
    #[error("Failed to dispatch email: {0}")]
    EmailDispatch(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmailNotVerified => StatusCode::FORBIDDEN,
            AuthError::InvalidToken => StatusCode::NOT_FOUND,
            AuthError::TokenAlreadyUsed => StatusCode::CONFLICT,
            AuthError::TokenExpired => StatusCode::GONE,
            AuthError::AlreadyVerified => StatusCode::CONFLICT,
            AuthError::ResendThrottled { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::EmailBlocked => StatusCode::LOCKED,
            AuthError::EmailDispatch(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken | AuthError::TokenAlreadyUsed | AuthError::AlreadyVerified => {
                ErrorKind::Conflict
            }
            AuthError::AccountNotFound | AuthError::InvalidToken => ErrorKind::NotFound,
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::EmailNotVerified => ErrorKind::Forbidden,
            AuthError::TokenExpired => ErrorKind::Gone,
            AuthError::ResendThrottled { .. } => ErrorKind::TooManyRequests,
            AuthError::EmailBlocked => ErrorKind::Locked,
            AuthError::EmailDispatch(_) => ErrorKind::ServiceUnavailable,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::EmailDispatch(msg) => {
                tracing::error!(message = %msg, "Email dispatch failure");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::EmailBlocked => {
                tracing::warn!("Resend attempt on blocked account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        // Structured bodies where the contract requires machine-readable
        // fields; everything else goes through the unified AppError shape.
        match &self {
            AuthError::Validation(fields) => (
                self.status_code(),
                Json(serde_json::json!({
                    "message": "Validation failed",
                    "errors": fields,
                })),
            )
                .into_response(),
            AuthError::ResendThrottled { wait_ms } => (
                self.status_code(),
                Json(serde_json::json!({
                    "nextResendDelayMs": wait_ms,
                })),
            )
                .into_response(),
            AuthError::EmailBlocked => (
                self.status_code(),
                Json(serde_json::json!({
                    "blocked": true,
                    "message": self.to_string(),
                })),
            )
                .into_response(),
            _ => self.to_app_error().into_response(),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<crate::domain::mailer::MailerError> for AuthError {
    fn from(err: crate::domain::mailer::MailerError) -> Self {
        AuthError::EmailDispatch(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::EmailNotVerified.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::TokenExpired.status_code(), StatusCode::GONE);
        assert_eq!(
            AuthError::ResendThrottled { wait_ms: 100 }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AuthError::EmailBlocked.status_code(), StatusCode::LOCKED);
        assert_eq!(
            AuthError::EmailDispatch("smtp down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(AuthError::InvalidToken.kind(), ErrorKind::NotFound);
        assert_eq!(AuthError::TokenAlreadyUsed.kind(), ErrorKind::Conflict);
        assert_eq!(AuthError::EmailBlocked.kind(), ErrorKind::Locked);
    }
}
