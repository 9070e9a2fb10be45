//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::account::Account;

// ============================================================================
// Register
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub github: Option<String>,
    pub experience_level: String,
}

/// Registration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub public_id: String,
    pub message: String,
}

// ============================================================================
// Verify Email
// ============================================================================

/// Email verification request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// Email verification response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponse {
    pub message: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: AccountProjection,
}

// ============================================================================
// Resend Verification
// ============================================================================

/// Resend verification request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendVerificationRequest {
    pub email: String,
}

/// Resend verification response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendVerificationResponse {
    pub message: String,
    /// Cooldown (ms) before the next resend will be accepted
    pub next_resend_delay_ms: i64,
}

// ============================================================================
// Account Projection
// ============================================================================

/// Outward-facing account view
///
/// Never carries the password hash or the resend bookkeeping.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProjection {
    pub public_id: String,
    pub email: String,
    pub display_name: String,
    pub github: Option<String>,
    pub experience_level: String,
    pub roles: Vec<String>,
    pub email_verified: bool,
}

impl From<&Account> for AccountProjection {
    fn from(account: &Account) -> Self {
        Self {
            public_id: account.public_id.to_string(),
            email: account.email.as_str().to_string(),
            display_name: account.display_name.as_str().to_string(),
            github: account.github.clone(),
            experience_level: account.experience_level.code().to_string(),
            roles: account.roles.iter().map(|r| r.code().to_string()).collect(),
            email_verified: account.email_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        AccountPassword, DisplayName, Email, ExperienceLevel, RawPassword,
    };

    #[test]
    fn test_projection_strips_credential() {
        let raw = RawPassword::new("correct horse battery".to_string()).unwrap();
        let account = Account::new(
            Email::new("alice@x.com").unwrap(),
            DisplayName::new("Alice").unwrap(),
            Some("alice-gh".to_string()),
            ExperienceLevel::Senior,
            AccountPassword::from_raw(&raw, None).unwrap(),
        );

        let projection = AccountProjection::from(&account);
        let json = serde_json::to_string(&projection).unwrap();

        assert!(json.contains("\"experienceLevel\":\"SENIOR\""));
        assert!(json.contains("\"emailVerified\":false"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("resend"));
    }
}
