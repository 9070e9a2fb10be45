//! From implementations mapping foreign error types into [`AppError`].
//!
//! Keeps `?` usable across crate boundaries: std and serde errors convert
//! unconditionally, database and HTTP integrations behind their features.

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind as Io;
        let kind = match err.kind() {
            Io::NotFound => ErrorKind::NotFound,
            Io::PermissionDenied => ErrorKind::Forbidden,
            Io::TimedOut => ErrorKind::RequestTimeout,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

impl From<std::string::FromUtf8Error> for AppError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        AppError::bad_request("Invalid UTF-8 string").with_source(err)
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::bad_request("Invalid integer format").with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let app_err = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut => {
                AppError::service_unavailable("Database connection pool exhausted")
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(code) => map_pg_code(code),
                None => AppError::internal("Database error"),
            },
            sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error"),
            sqlx::Error::Protocol(_) => AppError::internal("Database protocol error"),
            sqlx::Error::Tls(_) => AppError::internal("Database TLS error"),
            _ => AppError::internal("Database error"),
        };
        app_err.with_source(err)
    }
}

/// Map a PostgreSQL SQLSTATE to an error kind
///
/// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>.
/// Constraint violations (class 23) become client errors; resource and
/// shutdown conditions (classes 53 and 57) read as temporary outages.
#[cfg(feature = "sqlx")]
fn map_pg_code(code: &str) -> AppError {
    match code {
        "23505" => AppError::conflict("Duplicate key value"),
        "23503" => AppError::conflict("Foreign key violation"),
        "23502" => AppError::bad_request("Required field is null"),
        "23514" => AppError::bad_request("Check constraint violation"),
        "23000" => AppError::conflict("Integrity constraint violation"),
        code if code.starts_with("53") => {
            AppError::service_unavailable("Database resource exhausted")
        }
        code if code.starts_with("57") => AppError::service_unavailable("Database unavailable"),
        _ => AppError::internal("Database error"),
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 problem document
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}
