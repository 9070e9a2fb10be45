//! Verification Token Entity
//!
//! Single-use, expiring token proving control of an email address.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::account_id::AccountId;

/// Verification token lifetime
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Verification token entity
///
/// ## Lifecycle
/// Created at registration or on an allowed resend; consumed (sets
/// `used = true`) on the first successful verification; superseded tokens
/// for the same account are deleted when a resend issues a new one.
/// A used or expired token fails every later verification attempt.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    /// Opaque random token value (unique)
    pub token: String,
    /// Owning account
    pub account_id: AccountId,
    /// Expiry timestamp (creation + 24h)
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been consumed
    pub used: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Issue a fresh token for an account
    pub fn issue(account_id: AccountId) -> Self {
        Self::issue_at(account_id, Utc::now())
    }

    /// Issue a fresh token with an explicit creation time
    pub fn issue_at(account_id: AccountId, now: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            account_id,
            expires_at: now + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS),
            used: false,
            created_at: now,
        }
    }

    /// Whether the token has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Consume the token
    ///
    /// A consumed token is never mutated again.
    pub fn consume(&mut self) {
        self.used = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_24h_expiry() {
        let now = Utc::now();
        let token = VerificationToken::issue_at(AccountId::new(), now);
        assert_eq!(token.expires_at, now + Duration::hours(24));
        assert!(!token.used);
    }

    #[test]
    fn test_tokens_are_unique() {
        let id = AccountId::new();
        let a = VerificationToken::issue(id);
        let b = VerificationToken::issue(id);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let token = VerificationToken::issue_at(AccountId::new(), now);
        assert!(!token.is_expired(now));
        assert!(!token.is_expired(now + Duration::hours(23)));
        assert!(token.is_expired(now + Duration::hours(25)));
    }

    #[test]
    fn test_consume() {
        let mut token = VerificationToken::issue(AccountId::new());
        token.consume();
        assert!(token.used);
    }
}
