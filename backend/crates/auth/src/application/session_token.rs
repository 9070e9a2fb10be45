//! Session Token Signer
//!
//! Issues and validates stateless signed session tokens. A token is four
//! dot-separated fields:
//!
//! ```text
//! base64url(subject) . issued_at_ms . expires_at_ms . base64url(signature)
//! ```
//!
//! The signature is HMAC-SHA256 over the first three fields joined by dots,
//! so neither the subject nor the timestamps can be altered without
//! invalidating the token. Validation is fail-closed: any structural defect
//! answers the same way a forged signature does.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use platform::crypto::{from_base64url, to_base64url};

type HmacSha256 = Hmac<Sha256>;

/// Token rejection reasons surfaced by [`SessionTokenSigner::extract_subject`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionTokenError {
    /// Wrong field count, bad base64, or non-numeric timestamps
    #[error("malformed session token")]
    Malformed,
    /// Structure is fine but the signature does not verify
    #[error("invalid session token signature")]
    InvalidSignature,
}

/// Stateless HMAC-based session token signer
#[derive(Clone)]
pub struct SessionTokenSigner {
    key: [u8; 32],
    ttl: Duration,
}

impl SessionTokenSigner {
    pub fn new(key: [u8; 32], ttl: std::time::Duration) -> Self {
        Self {
            key,
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::hours(1)),
        }
    }

    /// Issue a token for `subject`, valid for the configured TTL from now
    pub fn issue(&self, subject: &str) -> String {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token with an explicit issue instant
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> String {
        let issued_at = now.timestamp_millis();
        let expires_at = (now + self.ttl).timestamp_millis();
        let payload = format!("{}.{}.{}", to_base64url(subject.as_bytes()), issued_at, expires_at);
        let signature = self.sign(&payload);
        format!("{}.{}", payload, to_base64url(&signature))
    }

    /// Validate `token` against the expected `subject` at the current time
    ///
    /// Returns `false` for any failure: bad structure, forged or truncated
    /// signature, expiry, or subject mismatch.
    pub fn validate(&self, token: &str, subject: &str) -> bool {
        self.validate_at(token, subject, Utc::now())
    }

    /// Validate with an explicit evaluation instant
    pub fn validate_at(&self, token: &str, subject: &str, now: DateTime<Utc>) -> bool {
        let Ok(claims) = self.verify(token) else {
            return false;
        };
        claims.subject == subject && now.timestamp_millis() < claims.expires_at_ms
    }

    /// Recover the subject from a structurally valid, correctly signed token
    ///
    /// Expiry is deliberately not checked here; callers pair this with
    /// [`validate`](Self::validate) when freshness matters.
    pub fn extract_subject(&self, token: &str) -> Result<String, SessionTokenError> {
        Ok(self.verify(token)?.subject)
    }

    fn sign(&self, payload: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Check structure and signature, returning the parsed claims
    fn verify(&self, token: &str) -> Result<Claims, SessionTokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [subject_b64, issued_raw, expires_raw, sig_b64] = parts.as_slice() else {
            return Err(SessionTokenError::Malformed);
        };

        let subject_bytes =
            from_base64url(subject_b64).map_err(|_| SessionTokenError::Malformed)?;
        let subject =
            String::from_utf8(subject_bytes).map_err(|_| SessionTokenError::Malformed)?;
        let issued_at_ms: i64 = issued_raw.parse().map_err(|_| SessionTokenError::Malformed)?;
        let expires_at_ms: i64 = expires_raw.parse().map_err(|_| SessionTokenError::Malformed)?;
        let signature = from_base64url(sig_b64).map_err(|_| SessionTokenError::Malformed)?;

        let payload = format!("{}.{}.{}", subject_b64, issued_raw, expires_raw);
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SessionTokenError::InvalidSignature)?;

        Ok(Claims {
            subject,
            issued_at_ms,
            expires_at_ms,
        })
    }
}

impl std::fmt::Debug for SessionTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenSigner")
            .field("key", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

struct Claims {
    subject: String,
    #[allow(dead_code)]
    issued_at_ms: i64,
    expires_at_ms: i64,
}
