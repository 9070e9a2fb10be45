//! Flow tests
//!
//! End-to-end use-case tests against in-memory implementations of the
//! repository and mailer ports.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokenSigner;
use crate::application::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, ResendVerificationInput,
    ResendVerificationUseCase, VerifyEmailInput, VerifyEmailUseCase,
};
use crate::domain::entity::{account::Account, verification_token::VerificationToken};
use crate::domain::mailer::{MailerError, VerificationMailer};
use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::domain::value_object::{AccountId, Email};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory fakes
// ============================================================================

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<Uuid, Account>,
    tokens: HashMap<String, VerificationToken>,
}

/// In-memory repository; the mutex gives `record_resend` the same
/// atomicity the Postgres transaction provides.
#[derive(Clone, Default)]
struct MemoryAuthRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl AccountRepository for MemoryAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .accounts
            .insert(*account.account_id.as_uuid(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.get(account_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.values().find(|a| a.email == *email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.values().any(|a| a.email == *email))
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .accounts
            .insert(*account.account_id.as_uuid(), account.clone());
        Ok(())
    }

    async fn record_resend(
        &self,
        account_id: &AccountId,
        expected_count: u16,
        now: DateTime<Utc>,
        token: &VerificationToken,
    ) -> AuthResult<bool> {
        let mut state = self.state.lock().unwrap();

        let Some(account) = state.accounts.get_mut(account_id.as_uuid()) else {
            return Ok(false);
        };
        if account.email_blocked || account.email_resend_count != expected_count {
            return Ok(false);
        }

        account.record_resend(now);
        let owner = *account_id.as_uuid();
        state.tokens.retain(|_, t| *t.account_id.as_uuid() != owner);
        state.tokens.insert(token.token.clone(), token.clone());
        Ok(true)
    }
}

impl VerificationTokenRepository for MemoryAuthRepository {
    async fn create(&self, token: &VerificationToken) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<VerificationToken>> {
        let state = self.state.lock().unwrap();
        Ok(state.tokens.get(token).cloned())
    }

    async fn update(&self, token: &VerificationToken) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> AuthResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.tokens.len();
        let owner = *account_id.as_uuid();
        state.tokens.retain(|_, t| *t.account_id.as_uuid() != owner);
        Ok((before - state.tokens.len()) as u64)
    }
}

/// Mailer fake recording every dispatch; can be flipped into failure mode
#[derive(Default)]
struct MockMailer {
    sent: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl MockMailer {
    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, t)| t.clone())
    }
}

impl VerificationMailer for MockMailer {
    async fn send_verification(&self, recipient: &Email, token: &str) -> Result<(), MailerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailerError("SMTP connection refused".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.as_str().to_string(), token.to_string()));
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    repo: Arc<MemoryAuthRepository>,
    mailer: Arc<MockMailer>,
    config: AuthConfig,
    signer: SessionTokenSigner,
}

impl Harness {
    fn new() -> Self {
        let config = AuthConfig::new([9u8; 32]);
        let signer = SessionTokenSigner::new(*config.token_secret(), config.ttl());
        Self {
            repo: Arc::new(MemoryAuthRepository::default()),
            mailer: Arc::new(MockMailer::default()),
            config,
            signer,
        }
    }

    fn register_use_case(&self) -> RegisterUseCase<MemoryAuthRepository, MockMailer> {
        RegisterUseCase::new(self.repo.clone(), self.mailer.clone(), self.config.clone())
    }

    fn verify_use_case(&self) -> VerifyEmailUseCase<MemoryAuthRepository> {
        VerifyEmailUseCase::new(self.repo.clone())
    }

    fn login_use_case(&self) -> LoginUseCase<MemoryAuthRepository> {
        LoginUseCase::new(self.repo.clone(), self.signer.clone(), self.config.clone())
    }

    fn resend_use_case(&self) -> ResendVerificationUseCase<MemoryAuthRepository, MockMailer> {
        ResendVerificationUseCase::new(self.repo.clone(), self.mailer.clone())
    }

    async fn register_alice(&self) -> crate::application::RegisterOutput {
        self.register_use_case()
            .execute(alice_input())
            .await
            .expect("registration should succeed")
    }

    async fn account_by_email(&self, email: &str) -> Account {
        AccountRepository::find_by_email(
            self.repo.as_ref(),
            &Email::new(email).unwrap(),
        )
        .await
        .unwrap()
        .expect("account should exist")
    }
}

fn alice_input() -> RegisterInput {
    RegisterInput {
        email: "alice@example.com".to_string(),
        password: "correct horse battery".to_string(),
        display_name: "Alice".to_string(),
        github: Some("alice-gh".to_string()),
        experience_level: "junior".to_string(),
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_creates_unverified_account_and_sends_email() {
    let h = Harness::new();
    let output = h.register_alice().await;

    assert!(!output.account.email_verified);
    assert_eq!(output.account.email_resend_count, 0);
    assert_eq!(h.mailer.sent_count(), 1);

    let sent = h.mailer.sent.lock().unwrap();
    assert_eq!(sent[0].0, "alice@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let h = Harness::new();
    h.register_alice().await;

    let result = h.register_use_case().execute(alice_input()).await;
    assert!(matches!(result, Err(AuthError::EmailTaken)));
    // No second email goes out
    assert_eq!(h.mailer.sent_count(), 1);
}

#[tokio::test]
async fn test_register_collects_all_validation_errors() {
    let h = Harness::new();
    let input = RegisterInput {
        email: "not-an-email".to_string(),
        password: "short".to_string(),
        display_name: "".to_string(),
        github: None,
        experience_level: "wizard".to_string(),
    };

    let result = h.register_use_case().execute(input).await;
    let Err(AuthError::Validation(errors)) = result else {
        panic!("expected validation failure");
    };
    let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
    assert_eq!(
        fields,
        vec!["email", "password", "displayName", "experienceLevel"]
    );
}

#[tokio::test]
async fn test_register_email_dispatch_failure_surfaces() {
    let h = Harness::new();
    h.mailer.fail.store(true, Ordering::SeqCst);

    let result = h.register_use_case().execute(alice_input()).await;
    assert!(matches!(result, Err(AuthError::EmailDispatch(_))));

    // The account persists; the resend flow is the recovery path
    let email = Email::new("alice@example.com").unwrap();
    assert!(
        AccountRepository::exists_by_email(h.repo.as_ref(), &email)
            .await
            .unwrap()
    );
}

// ============================================================================
// Verify + login flow
// ============================================================================

#[tokio::test]
async fn test_full_registration_to_login_flow() {
    let h = Harness::new();
    h.register_alice().await;

    // Login before verification is refused
    let result = h
        .login_use_case()
        .execute(LoginInput {
            email: "alice@example.com".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::EmailNotVerified)));

    // Verify with the token that went out by email
    let token = h.mailer.last_token().unwrap();
    h.verify_use_case()
        .execute(VerifyEmailInput { token })
        .await
        .expect("verification should succeed");

    // Login now succeeds and the session token validates
    let output = h
        .login_use_case()
        .execute(LoginInput {
            email: "alice@example.com".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .expect("login should succeed");
    assert!(h.signer.validate(&output.access_token, "alice@example.com"));

    // Wrong password stays a uniform credential failure
    let result = h
        .login_use_case()
        .execute(LoginInput {
            email: "alice@example.com".to_string(),
            password: "incorrect horse".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_unknown_email_is_uniform_failure() {
    let h = Harness::new();
    let result = h
        .login_use_case()
        .execute(LoginInput {
            email: "nobody@example.com".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_verify_email_token_reuse_rejected() {
    let h = Harness::new();
    h.register_alice().await;
    let token = h.mailer.last_token().unwrap();

    h.verify_use_case()
        .execute(VerifyEmailInput {
            token: token.clone(),
        })
        .await
        .unwrap();

    let result = h.verify_use_case().execute(VerifyEmailInput { token }).await;
    assert!(matches!(result, Err(AuthError::TokenAlreadyUsed)));
}

#[tokio::test]
async fn test_verify_email_unknown_token_rejected() {
    let h = Harness::new();
    let result = h
        .verify_use_case()
        .execute(VerifyEmailInput {
            token: Uuid::new_v4().to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_verify_email_expired_token_rejected() {
    let h = Harness::new();
    h.register_alice().await;
    let token = h.mailer.last_token().unwrap();

    let later = Utc::now() + Duration::hours(25);
    let result = h
        .verify_use_case()
        .execute_at(VerifyEmailInput { token }, later)
        .await;
    assert!(matches!(result, Err(AuthError::TokenExpired)));
}

// ============================================================================
// Resend throttling
// ============================================================================

#[tokio::test]
async fn test_resend_escalates_and_locks_out() {
    let h = Harness::new();
    h.register_alice().await;
    let uc = h.resend_use_case();
    let input = ResendVerificationInput {
        email: "alice@example.com".to_string(),
    };

    let mut now = Utc::now();

    // Four resends succeed when each cooldown has fully elapsed
    for (i, cooldown_secs) in [0i64, 30, 60, 720].iter().enumerate() {
        now += Duration::seconds(*cooldown_secs);
        let output = uc
            .execute_at(input.clone(), now)
            .await
            .unwrap_or_else(|e| panic!("resend {} should succeed, got {e:?}", i + 1));
        assert!(output.next_resend_delay_ms > 0);
    }
    // Registration email + 4 resends
    assert_eq!(h.mailer.sent_count(), 5);

    // The 5th attempt hits the cap, whatever the elapsed time
    now += Duration::days(30);
    let result = uc.execute_at(input.clone(), now).await;
    assert!(matches!(result, Err(AuthError::EmailBlocked)));

    // The lockout persisted and holds on later attempts
    let account = h.account_by_email("alice@example.com").await;
    assert!(account.email_blocked);
    assert_eq!(account.email_resend_count, 4);

    let result = uc.execute_at(input, now + Duration::days(365)).await;
    assert!(matches!(result, Err(AuthError::EmailBlocked)));
    assert_eq!(h.mailer.sent_count(), 5);
}

#[tokio::test]
async fn test_resend_within_cooldown_reports_remaining_wait() {
    let h = Harness::new();
    h.register_alice().await;
    let uc = h.resend_use_case();
    let input = ResendVerificationInput {
        email: "alice@example.com".to_string(),
    };

    let now = Utc::now();
    uc.execute_at(input.clone(), now).await.unwrap();

    // 10s into the 30s cooldown leaves 20s
    let result = uc.execute_at(input, now + Duration::seconds(10)).await;
    let Err(AuthError::ResendThrottled { wait_ms }) = result else {
        panic!("expected throttled resend");
    };
    assert_eq!(wait_ms, 20_000);
}

#[tokio::test]
async fn test_resend_rotates_token() {
    let h = Harness::new();
    h.register_alice().await;
    let first_token = h.mailer.last_token().unwrap();

    h.resend_use_case()
        .execute(ResendVerificationInput {
            email: "alice@example.com".to_string(),
        })
        .await
        .unwrap();
    let second_token = h.mailer.last_token().unwrap();
    assert_ne!(first_token, second_token);

    // The superseded token is gone
    let stale = VerificationTokenRepository::find_by_token(h.repo.as_ref(), &first_token)
        .await
        .unwrap();
    assert!(stale.is_none());

    // The fresh one verifies
    h.verify_use_case()
        .execute(VerifyEmailInput {
            token: second_token,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_resend_unknown_email_not_found() {
    let h = Harness::new();
    let result = h
        .resend_use_case()
        .execute(ResendVerificationInput {
            email: "nobody@example.com".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::AccountNotFound)));
}

#[tokio::test]
async fn test_resend_after_verification_rejected() {
    let h = Harness::new();
    h.register_alice().await;
    let token = h.mailer.last_token().unwrap();
    h.verify_use_case()
        .execute(VerifyEmailInput { token })
        .await
        .unwrap();

    let result = h
        .resend_use_case()
        .execute(ResendVerificationInput {
            email: "alice@example.com".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::AlreadyVerified)));
}

#[tokio::test]
async fn test_concurrent_resends_collapse_to_one() {
    let h = Harness::new();
    h.register_alice().await;
    let sent_before = h.mailer.sent_count();

    let uc = Arc::new(h.resend_use_case());
    let now = Utc::now();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let uc = Arc::clone(&uc);
        handles.push(tokio::spawn(async move {
            uc.execute_at(
                ResendVerificationInput {
                    email: "alice@example.com".to_string(),
                },
                now,
            )
            .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    // Exactly one racing request wins; the counter moved exactly once
    assert_eq!(successes, 1);
    assert_eq!(h.mailer.sent_count(), sent_before + 1);
    let account = h.account_by_email("alice@example.com").await;
    assert_eq!(account.email_resend_count, 1);
}
