//! Error classification.
//!
//! [`ErrorKind`] names the category of a failure; each category carries
//! exactly one HTTP status, so presentation code never inspects message
//! strings to pick a response.

use serde::Serialize;

/// Category of an application error
///
/// Variants follow RFC 9110 status semantics. The enum is `non_exhaustive`
/// so categories can be added without a breaking release.
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.status_code(), 404);
/// assert_eq!(kind.as_str(), "Not Found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400, the request itself is malformed or invalid
    BadRequest,
    /// 401, authentication missing or failed
    Unauthorized,
    /// 403, authenticated but not allowed
    Forbidden,
    /// 404, no such resource
    NotFound,
    /// 408, the request took too long
    RequestTimeout,
    /// 409, conflicts with current state
    Conflict,
    /// 410, existed once, permanently gone or expired
    Gone,
    /// 422, well-formed but semantically unusable
    UnprocessableEntity,
    /// 423, locked pending manual intervention
    Locked,
    /// 429, rate limit exceeded
    TooManyRequests,
    /// 500, our fault
    InternalServerError,
    /// 503, a dependency is down or overloaded
    ServiceUnavailable,
}

impl ErrorKind {
    /// The HTTP status this kind responds with
    ///
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::BadRequest.status_code(), 400);
    /// assert_eq!(ErrorKind::NotFound.status_code(), 404);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::RequestTimeout => 408,
            Self::Conflict => 409,
            Self::Gone => 410,
            Self::UnprocessableEntity => 422,
            Self::Locked => 423,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
        }
    }

    /// The standard reason phrase
    ///
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::BadRequest.as_str(), "Bad Request");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::RequestTimeout => "Request Timeout",
            Self::Conflict => "Conflict",
            Self::Gone => "Gone",
            Self::UnprocessableEntity => "Unprocessable Entity",
            Self::Locked => "Locked",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 5xx, worth an error-level log line
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// 4xx, the caller's problem
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
