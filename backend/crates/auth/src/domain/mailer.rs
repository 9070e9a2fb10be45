//! Verification Mailer Port
//!
//! Outbound email dispatch is an external collaborator; the domain only
//! depends on this trait. Dispatch failure is part of the flow outcome,
//! never fire-and-forget.

use thiserror::Error;

use crate::domain::value_object::email::Email;

/// Email dispatch failure
#[derive(Debug, Error)]
#[error("Email dispatch failed: {0}")]
pub struct MailerError(pub String);

/// Capability to deliver a verification email carrying a token
#[trait_variant::make(VerificationMailer: Send)]
pub trait LocalVerificationMailer {
    /// Send a verification email with the given token to `recipient`
    async fn send_verification(&self, recipient: &Email, token: &str) -> Result<(), MailerError>;
}
