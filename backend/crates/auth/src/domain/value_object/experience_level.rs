//! Experience Level Value Object
//!
//! Self-declared developer seniority, collected at registration.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error for unknown experience level codes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown experience level: {0}")]
pub struct ExperienceLevelError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum ExperienceLevel {
    Junior = 0,
    Pleno = 1,
    Senior = 2,
}

impl ExperienceLevel {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use ExperienceLevel::*;
        match self {
            Junior => "JUNIOR",
            Pleno => "PLENO",
            Senior => "SENIOR",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use ExperienceLevel::*;
        match id {
            0 => Junior,
            1 => Pleno,
            2 => Senior,
            _ => {
                tracing::error!("Invalid ExperienceLevel id: {}", id);
                unreachable!("Invalid ExperienceLevel id: {}", id)
            }
        }
    }

    /// Parse from a request code, case-insensitively
    pub fn parse(code: &str) -> Result<Self, ExperienceLevelError> {
        use ExperienceLevel::*;
        match code.trim().to_uppercase().as_str() {
            "JUNIOR" => Ok(Junior),
            "PLENO" => Ok(Pleno),
            "SENIOR" => Ok(Senior),
            other => Err(ExperienceLevelError(other.to_string())),
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
