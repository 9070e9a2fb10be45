//! Account Role Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, Hash,
)]
#[repr(i16)]
pub enum AccountRole {
    /// Base role, assigned to every account at creation
    #[default]
    User = 0,
    Admin = 1,
}

impl AccountRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use AccountRole::*;
        match self {
            User => "user",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use AccountRole::*;
        match id {
            0 => User,
            1 => Admin,
            _ => {
                tracing::error!("Invalid AccountRole id: {}", id);
                unreachable!("Invalid AccountRole id: {}", id)
            }
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Self {
        use AccountRole::*;
        match code {
            "user" => User,
            "admin" => Admin,
            _ => {
                tracing::error!("Invalid AccountRole code: {}", code);
                unreachable!("Invalid AccountRole code: {}", code)
            }
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
