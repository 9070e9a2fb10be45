//! Verify Email Use Case
//!
//! Consumes a verification token and marks the owning account's email as
//! verified. Each rejection reason is distinguishable so the client can
//! tell a stale link from a reused one.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct VerifyEmailInput {
    pub token: String,
}

#[derive(Debug)]
pub struct VerifyEmailOutput {
    pub account: Account,
}

pub struct VerifyEmailUseCase<R> {
    repo: Arc<R>,
}

impl<R> VerifyEmailUseCase<R>
where
    R: AccountRepository + VerificationTokenRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: VerifyEmailInput) -> AuthResult<VerifyEmailOutput> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: VerifyEmailInput,
        now: DateTime<Utc>,
    ) -> AuthResult<VerifyEmailOutput> {
        let mut token =
            VerificationTokenRepository::find_by_token(self.repo.as_ref(), &input.token)
                .await?
                .ok_or(AuthError::InvalidToken)?;

        // Used takes precedence over expired: a consumed token answers the
        // same way even after its expiry passes.
        if token.used {
            return Err(AuthError::TokenAlreadyUsed);
        }
        if token.is_expired(now) {
            return Err(AuthError::TokenExpired);
        }

        let mut account = AccountRepository::find_by_id(self.repo.as_ref(), &token.account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        account.mark_email_verified();
        token.consume();

        AccountRepository::update(self.repo.as_ref(), &account).await?;
        VerificationTokenRepository::update(self.repo.as_ref(), &token).await?;

        tracing::info!(public_id = %account.public_id, "Email verified");

        Ok(VerifyEmailOutput { account })
    }
}
