//! Login Use Case
//!
//! Verifies credentials and issues a signed session token. An unknown
//! email, a malformed email and a wrong password all answer
//! [`AuthError::InvalidCredentials`] so the endpoint cannot be used to
//! enumerate accounts. The verified-email gate fires before the password
//! check: an unverified account is told to verify, not guessed against.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokenSigner;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub account: Account,
}

pub struct LoginUseCase<R> {
    repo: Arc<R>,
    signer: SessionTokenSigner,
    config: AuthConfig,
}

impl<R> LoginUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, signer: SessionTokenSigner, config: AuthConfig) -> Self {
        Self {
            repo,
            signer,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: LoginInput,
        now: DateTime<Utc>,
    ) -> AuthResult<LoginOutput> {
        // Malformed submissions cannot match any account, so they collapse
        // into the uniform credential failure.
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        if !account.password_hash.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.signer.issue_at(account.email.as_str(), now);

        tracing::info!(public_id = %account.public_id, "Login succeeded");

        Ok(LoginOutput {
            access_token,
            account,
        })
    }
}
