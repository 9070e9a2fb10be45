//! Resend Verification Use Case
//!
//! Re-issues the verification email under the escalating throttle policy.
//! The counter update, token rotation and timestamp land in one
//! compare-and-set persistence call, so racing requests for the same
//! account collapse to a single resend.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entity::verification_token::VerificationToken;
use crate::domain::mailer::VerificationMailer;
use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::domain::throttle::{self, ResendDecision};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult, FieldError};

#[derive(Debug, Clone)]
pub struct ResendVerificationInput {
    pub email: String,
}

#[derive(Debug)]
pub struct ResendVerificationOutput {
    /// Cooldown (ms) the client must wait before the next resend
    pub next_resend_delay_ms: i64,
}

pub struct ResendVerificationUseCase<R, M> {
    repo: Arc<R>,
    mailer: Arc<M>,
}

impl<R, M> ResendVerificationUseCase<R, M>
where
    R: AccountRepository + VerificationTokenRepository,
    M: VerificationMailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>) -> Self {
        Self { repo, mailer }
    }

    pub async fn execute(
        &self,
        input: ResendVerificationInput,
    ) -> AuthResult<ResendVerificationOutput> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: ResendVerificationInput,
        now: DateTime<Utc>,
    ) -> AuthResult<ResendVerificationOutput> {
        let email = Email::new(input.email).map_err(|e| {
            AuthError::Validation(vec![FieldError::new("email", e.message())])
        })?;

        let mut account = AccountRepository::find_by_email(self.repo.as_ref(), &email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if account.email_verified {
            return Err(AuthError::AlreadyVerified);
        }

        match throttle::evaluate(&account, now) {
            ResendDecision::Blocked => {
                // Reaching the threshold flips the persistent flag; once set
                // it never clears.
                if !account.email_blocked {
                    account.block_email();
                    AccountRepository::update(self.repo.as_ref(), &account).await?;
                    tracing::warn!(
                        public_id = %account.public_id,
                        "Resend allowance exhausted, account email-blocked"
                    );
                }
                Err(AuthError::EmailBlocked)
            }
            ResendDecision::Cooling { wait_ms } => Err(AuthError::ResendThrottled { wait_ms }),
            ResendDecision::Allowed => {
                let expected_count = account.email_resend_count;
                let token = VerificationToken::issue_at(account.account_id, now);

                let won = AccountRepository::record_resend(
                    self.repo.as_ref(),
                    &account.account_id,
                    expected_count,
                    now,
                    &token,
                )
                .await?;

                if !won {
                    // A concurrent resend advanced the counter first; answer
                    // with the wait its success implies.
                    let fresh = AccountRepository::find_by_email(self.repo.as_ref(), &email)
                        .await?
                        .ok_or(AuthError::AccountNotFound)?;
                    return match throttle::evaluate(&fresh, now) {
                        ResendDecision::Blocked => Err(AuthError::EmailBlocked),
                        ResendDecision::Cooling { wait_ms } => {
                            Err(AuthError::ResendThrottled { wait_ms })
                        }
                        ResendDecision::Allowed => Err(AuthError::ResendThrottled {
                            wait_ms: throttle::cooldown_ms(fresh.email_resend_count),
                        }),
                    };
                }

                self.mailer
                    .send_verification(&account.email, &token.token)
                    .await?;

                let new_count = expected_count + 1;
                tracing::info!(
                    public_id = %account.public_id,
                    resend_count = new_count,
                    "Verification email re-sent"
                );

                Ok(ResendVerificationOutput {
                    next_resend_delay_ms: throttle::cooldown_ms(new_count),
                })
            }
        }
    }
}
