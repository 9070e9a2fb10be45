//! Account Entity
//!
//! A registered account with its credential and email-verification
//! lifecycle state. The password hash lives on the entity but is stripped
//! from every outward projection.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    account_id::AccountId, account_password::AccountPassword, account_role::AccountRole,
    display_name::DisplayName, email::Email, experience_level::ExperienceLevel,
    public_id::PublicId,
};

/// Account entity
///
/// ## Lifecycle
/// An account is created unverified (`email_verified = false`) and becomes
/// verified exactly once; there is no un-verify transition. The resend
/// bookkeeping (`email_resend_count`, `last_email_resend_at`,
/// `email_blocked`) is mutated only through the resend flow.
///
/// ## Invariants
/// - `roles` is non-empty; the base role is assigned at creation
/// - `email_resend_count == 0` iff `last_email_resend_at == None`
/// - `email_blocked` is terminal: no method on this entity clears it
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: AccountId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// Login identity, unique
    pub email: Email,
    /// Profile display name
    pub display_name: DisplayName,
    /// Optional GitHub handle
    pub github: Option<String>,
    /// Self-declared seniority
    pub experience_level: ExperienceLevel,
    /// Hashed credential
    pub password_hash: AccountPassword,
    /// Role set; always contains at least [`AccountRole::User`]
    pub roles: BTreeSet<AccountRole>,
    /// Whether the email address has been verified
    pub email_verified: bool,
    /// Number of verification emails re-sent so far
    pub email_resend_count: u16,
    /// When the most recent resend happened
    pub last_email_resend_at: Option<DateTime<Utc>>,
    /// Terminal lockout flag, set after exhausting the resend allowance
    pub email_blocked: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, unverified account with the base role
    pub fn new(
        email: Email,
        display_name: DisplayName,
        github: Option<String>,
        experience_level: ExperienceLevel,
        password_hash: AccountPassword,
    ) -> Self {
        let now = Utc::now();
        let mut roles = BTreeSet::new();
        roles.insert(AccountRole::User);

        Self {
            account_id: AccountId::new(),
            public_id: PublicId::new(),
            email,
            display_name,
            github,
            experience_level,
            password_hash,
            roles,
            email_verified: false,
            email_resend_count: 0,
            last_email_resend_at: None,
            email_blocked: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the email as verified
    ///
    /// Monotonic: once verified, repeated calls are no-ops.
    pub fn mark_email_verified(&mut self) {
        if !self.email_verified {
            self.email_verified = true;
            self.updated_at = Utc::now();
        }
    }

    /// Record a successful verification-email resend
    ///
    /// Increments the counter by exactly one and stamps the resend time.
    /// Callers must only invoke this after the throttle policy allowed the
    /// resend; persistence must pair it with a compare-and-set on the
    /// previous counter value (see the repository contract).
    pub fn record_resend(&mut self, now: DateTime<Utc>) {
        self.email_resend_count += 1;
        self.last_email_resend_at = Some(now);
        self.updated_at = now;
    }

    /// Enter the terminal email lockout state
    ///
    /// There is no entity-level unblock; recovery requires out-of-band
    /// intervention.
    pub fn block_email(&mut self) {
        self.email_blocked = true;
        self.updated_at = Utc::now();
    }

    /// Whether this account holds the admin role
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&AccountRole::Admin)
    }
}
