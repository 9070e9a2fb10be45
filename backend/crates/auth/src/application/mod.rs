//! Application Layer
//!
//! Use cases orchestrating the domain: registration, email verification,
//! login and verification-email resend, plus configuration and the session
//! token signer.

pub mod config;
pub mod login;
pub mod register;
pub mod resend_verification;
pub mod session_token;
pub mod verify_email;

pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use resend_verification::{
    ResendVerificationInput, ResendVerificationOutput, ResendVerificationUseCase,
};
pub use session_token::{SessionTokenError, SessionTokenSigner};
pub use verify_email::{VerifyEmailInput, VerifyEmailOutput, VerifyEmailUseCase};
