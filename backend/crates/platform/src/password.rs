//! Password hashing and verification.
//!
//! Credentials pass through two types with a one-way door between them:
//! [`ClearTextPassword`] holds the submitted secret (zeroized on drop, never
//! cloned, redacted in Debug) and [`HashedPassword`] holds the Argon2id PHC
//! string that is safe to persist. Length rules follow NIST SP 800-63B and
//! input is NFKC-normalized so visually equal passwords hash equally.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum accepted password length, in Unicode scalar values
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length, in Unicode scalar values
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Rejection reasons for a submitted password
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Failures while producing or parsing a hash
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Mix the optional pepper into the bytes fed to Argon2
///
/// The pepper is appended rather than keyed in because the `argon2` crate's
/// keyed mode would tie us to a fixed key length; append keeps the stored
/// PHC string standard.
fn peppered(password: &ClearTextPassword, pepper: Option<&[u8]>) -> Vec<u8> {
    let mut bytes = password.0.as_bytes().to_vec();
    if let Some(p) = pepper {
        bytes.extend_from_slice(p);
    }
    bytes
}

/// A validated clear-text password
///
/// Holds the secret only as long as needed: the backing memory is zeroized
/// when the value drops, the type is not Clone, and Debug prints a
/// placeholder.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate and normalize a submitted password
    ///
    /// NFKC-normalizes first, then enforces the policy: non-empty after
    /// trim, length between [`MIN_PASSWORD_LENGTH`] and
    /// [`MAX_PASSWORD_LENGTH`] counted in characters, and no control
    /// characters other than space, tab and newline.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Lengths count code points, not bytes
        let length = normalized.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: length,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && !matches!(ch, ' ' | '\t' | '\n'))
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Hash with Argon2id, producing a PHC string
    ///
    /// A fresh random salt is drawn per call; `Argon2::default()` carries
    /// the OWASP-recommended Argon2id parameters (19 MiB, t=2, p=1).
    /// When a pepper is supplied, verification must supply the same one.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let material = peppered(self, pepper);
        let salt = SaltString::generate(OsRng);

        let phc = Argon2::default()
            .hash_password(&material, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(HashedPassword(phc))
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// An Argon2id hash in PHC string form, safe to store
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Parse a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = s.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self(phc))
    }

    /// The PHC string for persistence
    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    /// Check a submitted password against this hash
    ///
    /// Comparison happens inside Argon2 in constant time. Every failure
    /// mode answers plain `false`; the caller learns nothing else.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        let material = peppered(password, pepper);
        Argon2::default().verify_password(&material, &parsed).is_ok()
    }

    /// Whether the stored hash predates the current scheme
    ///
    /// True for unparseable hashes and for any algorithm other than
    /// Argon2id, signaling a rehash on next successful login.
    pub fn needs_rehash(&self) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => parsed.algorithm != argon2::Algorithm::Argon2id.ident(),
            Err(_) => true,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashedPassword").field(&"[HASH]").finish()
    }
}
