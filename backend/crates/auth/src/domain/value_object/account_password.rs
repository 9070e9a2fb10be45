//! Account Password Value Object
//!
//! Domain value object for account passwords.
//! Delegates to `platform::password` for cryptographic operations.
//!
//! ## Security Features
//! - Argon2id hashing (memory-hard)
//! - Automatic memory zeroization
//! - Constant-time comparison
//! - Unicode NFKC normalization

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Wrapper around `ClearTextPassword` with domain-specific error handling.
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with validation
    ///
    /// ## Validation Rules (NIST SP 800-63B)
    /// - Minimum 8 characters
    /// - Maximum 128 characters
    /// - No control characters
    /// - Unicode NFKC normalized
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, actual } => AppError::bad_request(format!(
                "Password must be at least {} characters (got {})",
                min, actual
            ))
            .with_action("Please choose a longer password"),

            PasswordPolicyError::TooLong { max, actual } => AppError::bad_request(format!(
                "Password must be at most {} characters (got {})",
                max, actual
            ))
            .with_action("Please choose a shorter password"),

            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password cannot be empty")
                    .with_action("Please enter a password")
            }

            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
                    .with_action("Please remove any special control characters")
            }
        })?;

        Ok(Self(clear_text))
    }

    #[inline]
    pub(crate) fn as_clear_text(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Account Password (Hashed, safe to store)
// ============================================================================

/// Hashed account password in PHC string format
///
/// This is the only credential representation that ever leaves the domain
/// layer; it is never serialized into outward-facing projections.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountPassword(HashedPassword);

impl AccountPassword {
    /// Hash a raw password for storage
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw
            .as_clear_text()
            .hash(pepper)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))?;
        Ok(Self(hashed))
    }

    /// Create from a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(s)
            .map_err(|e| AppError::internal("Invalid stored password hash").with_source(e))?;
        Ok(Self(hashed))
    }

    /// Get the PHC string for storage
    #[inline]
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a submitted password against this hash
    ///
    /// Constant-time; failure is silent (returns false).
    #[inline]
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.as_clear_text(), pepper)
    }
}

impl fmt::Debug for AccountPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccountPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_policy() {
        assert!(RawPassword::new("".to_string()).is_err());
        assert!(RawPassword::new("short".to_string()).is_err());
        assert!(RawPassword::new("a valid passphrase".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = AccountPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&raw, None));

        let wrong = RawPassword::new("incorrect horse".to_string()).unwrap();
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_phc_roundtrip() {
        let raw = RawPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = AccountPassword::from_raw(&raw, None).unwrap();

        let restored = AccountPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, None));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = AccountPassword::from_raw(&raw, None).unwrap();
        assert!(!format!("{:?}", raw).contains("horse"));
        assert!(!format!("{:?}", hashed).contains("argon2"));
    }
}
