//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokenSigner;
use crate::domain::mailer::VerificationMailer;
use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::infra::email::{LogMailer, SmtpMailer};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the auth router with the PostgreSQL repository and SMTP mailer
pub fn auth_router(repo: PgAuthRepository, mailer: SmtpMailer, config: AuthConfig) -> Router {
    auth_router_generic(repo, mailer, config)
}

/// Create the auth router with the log-only mailer (local development)
pub fn auth_router_dev(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, LogMailer, config)
}

/// Create a generic auth router for any repository and mailer implementation
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: AccountRepository + VerificationTokenRepository + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let signer = SessionTokenSigner::new(*config.token_secret(), config.ttl());
    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config,
        signer,
    };

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/verify-email", post(handlers::verify_email::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route(
            "/resend-verification",
            post(handlers::resend_verification::<R, M>),
        )
        .with_state(state)
}
