//! Display Name Value Object
//!
//! The name shown on an account's public profile. Unlike a login handle it
//! carries no uniqueness requirement, so validation is limited to
//! normalization and length bounds.
//!
//! ## Invariants
//! - Non-empty after trim
//! - At most 100 characters (after NFKC normalization)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for a display name (in characters)
pub const DISPLAY_NAME_MAX_LENGTH: usize = 100;

/// Display name validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayNameError {
    #[error("Display name cannot be empty")]
    Empty,

    #[error("Display name must be at most {max} characters (got {length})")]
    TooLong { length: usize, max: usize },
}

/// Validated, NFKC-normalized display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName from raw input
    ///
    /// Applies NFKC normalization and trims surrounding whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let normalized: String = input.as_ref().nfkc().collect::<String>().trim().to_string();

        if normalized.is_empty() {
            return Err(DisplayNameError::Empty);
        }

        let length = normalized.chars().count();
        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(DisplayNameError::TooLong {
                length,
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }

        Ok(Self(normalized))
    }

    /// Create from database value (assumes already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DisplayNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
