//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokenSigner;
use crate::application::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, ResendVerificationInput,
    ResendVerificationUseCase, VerifyEmailInput, VerifyEmailUseCase,
};
use crate::domain::mailer::VerificationMailer;
use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    AccountProjection, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    ResendVerificationRequest, ResendVerificationResponse, VerifyEmailRequest, VerifyEmailResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, M>
where
    R: AccountRepository + VerificationTokenRepository + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: AuthConfig,
    pub signer: SessionTokenSigner,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: AccountRepository + VerificationTokenRepository + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        email: req.email,
        password: req.password,
        display_name: req.display_name,
        github: req.github,
        experience_level: req.experience_level,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            public_id: output.account.public_id.to_string(),
            message: "Registration successful. Please check your email to verify your account."
                .to_string(),
        }),
    ))
}

// ============================================================================
// Verify Email
// ============================================================================

/// POST /api/auth/verify-email
pub async fn verify_email<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<VerifyEmailRequest>,
) -> AuthResult<Json<VerifyEmailResponse>>
where
    R: AccountRepository + VerificationTokenRepository + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(state.repo.clone());

    use_case
        .execute(VerifyEmailInput { token: req.token })
        .await?;

    Ok(Json(VerifyEmailResponse {
        message: "Email verified successfully.".to_string(),
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AccountRepository + VerificationTokenRepository + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        access_token: output.access_token,
        user: AccountProjection::from(&output.account),
    }))
}

// ============================================================================
// Resend Verification
// ============================================================================

/// POST /api/auth/resend-verification
pub async fn resend_verification<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ResendVerificationRequest>,
) -> AuthResult<Json<ResendVerificationResponse>>
where
    R: AccountRepository + VerificationTokenRepository + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = ResendVerificationUseCase::new(state.repo.clone(), state.mailer.clone());

    let output = use_case
        .execute(ResendVerificationInput { email: req.email })
        .await?;

    Ok(Json(ResendVerificationResponse {
        message: "Verification email re-sent. Please check your inbox.".to_string(),
        next_resend_delay_ms: output.next_resend_delay_ms,
    }))
}
