//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{account::Account, verification_token::VerificationToken};
use crate::domain::value_object::{account_id::AccountId, email::Email};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Find account by email (case-sensitive)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update an account
    async fn update(&self, account: &Account) -> AuthResult<()>;

    /// Atomically record a resend: rotate the verification token and bump
    /// the counter, guarded by a compare-and-set on the previous count.
    ///
    /// In one atomic unit:
    /// - set `email_resend_count = expected_count + 1` and
    ///   `last_email_resend_at = now`, but only while the stored count still
    ///   equals `expected_count` and the account is not blocked
    /// - delete all prior verification tokens for the account
    /// - insert `token`
    ///
    /// Returns `false` (with no mutation) when a concurrent resend won the
    /// race; exactly one of N racing callers observes `true`.
    async fn record_resend(
        &self,
        account_id: &AccountId,
        expected_count: u16,
        now: DateTime<Utc>,
        token: &VerificationToken,
    ) -> AuthResult<bool>;
}

/// Verification token repository trait
#[trait_variant::make(VerificationTokenRepository: Send)]
pub trait LocalVerificationTokenRepository {
    /// Create a verification token
    async fn create(&self, token: &VerificationToken) -> AuthResult<()>;

    /// Find a token by its opaque value
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<VerificationToken>>;

    /// Update a token (used on consumption)
    async fn update(&self, token: &VerificationToken) -> AuthResult<()>;

    /// Delete all tokens for an account, returning the number deleted
    async fn delete_all_for_account(&self, account_id: &AccountId) -> AuthResult<u64>;
}
