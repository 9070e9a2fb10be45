//! Register Use Case
//!
//! Creates an unverified account, issues its first verification token and
//! dispatches the verification email. Boundary validation collects every
//! field failure before answering so the client can render them all at once.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::{account::Account, verification_token::VerificationToken};
use crate::domain::mailer::VerificationMailer;
use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::domain::value_object::{
    AccountPassword, DisplayName, Email, ExperienceLevel, RawPassword,
};
use crate::error::{AuthError, AuthResult, FieldError};

/// Raw registration request, pre-validation
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub github: Option<String>,
    pub experience_level: String,
}

/// Outcome of a successful registration
#[derive(Debug)]
pub struct RegisterOutput {
    pub account: Account,
}

pub struct RegisterUseCase<R, M> {
    repo: Arc<R>,
    mailer: Arc<M>,
    config: AuthConfig,
}

impl<R, M> RegisterUseCase<R, M>
where
    R: AccountRepository + VerificationTokenRepository,
    M: VerificationMailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: AuthConfig) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: RegisterInput,
        now: DateTime<Utc>,
    ) -> AuthResult<RegisterOutput> {
        let (email, raw_password, display_name, experience_level) = self.validate(&input)?;

        if AccountRepository::exists_by_email(self.repo.as_ref(), &email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = AccountPassword::from_raw(&raw_password, self.config.pepper())?;
        let account = Account::new(
            email,
            display_name,
            input.github.clone().filter(|g| !g.trim().is_empty()),
            experience_level,
            password_hash,
        );
        let token = VerificationToken::issue_at(account.account_id, now);

        AccountRepository::create(self.repo.as_ref(), &account).await?;
        VerificationTokenRepository::create(self.repo.as_ref(), &token).await?;

        // The account persists even when dispatch fails; the resend flow is
        // the recovery path.
        self.mailer
            .send_verification(&account.email, &token.token)
            .await?;

        tracing::info!(
            public_id = %account.public_id,
            "Account registered, verification email dispatched"
        );

        Ok(RegisterOutput { account })
    }

    /// Validate every field, collecting all failures
    fn validate(
        &self,
        input: &RegisterInput,
    ) -> AuthResult<(Email, RawPassword, DisplayName, ExperienceLevel)> {
        let mut errors = Vec::new();

        let email = match Email::new(input.email.clone()) {
            Ok(e) => Some(e),
            Err(e) => {
                errors.push(FieldError::new("email", e.message()));
                None
            }
        };

        let password = match RawPassword::new(input.password.clone()) {
            Ok(p) => Some(p),
            Err(e) => {
                errors.push(FieldError::new("password", e.message()));
                None
            }
        };

        let display_name = match DisplayName::new(&input.display_name) {
            Ok(n) => Some(n),
            Err(e) => {
                errors.push(FieldError::new("displayName", e.to_string()));
                None
            }
        };

        let experience_level = match ExperienceLevel::parse(&input.experience_level) {
            Ok(l) => Some(l),
            Err(e) => {
                errors.push(FieldError::new("experienceLevel", e.to_string()));
                None
            }
        };

        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        // All Some when errors is empty
        Ok((
            email.unwrap(),
            password.unwrap(),
            display_name.unwrap(),
            experience_level.unwrap(),
        ))
    }
}
