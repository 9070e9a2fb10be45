//! Email Delivery
//!
//! Two [`VerificationMailer`] implementations: an SMTP mailer for real
//! deployments and a log-only mailer for local development, where the
//! verification link lands in the server log instead of an inbox.

use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::domain::mailer::{MailerError, VerificationMailer};
use crate::domain::value_object::Email;

/// SMTP connection settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address, e.g. `noreply@example.com`
    pub from: String,
    /// Public base URL the verification link points at
    pub verify_base_url: String,
}

/// SMTP-backed verification mailer
///
/// lettre's blocking transport runs on the blocking pool so SMTP latency
/// never stalls the async runtime.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<SmtpTransport>,
    from: String,
    verify_base_url: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, MailerError> {
        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| MailerError(format!("SMTP relay setup failed: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self {
            transport: Arc::new(transport),
            from: config.from,
            verify_base_url: config.verify_base_url,
        })
    }

    fn build_message(&self, recipient: &Email, token: &str) -> Result<Message, MailerError> {
        let link = format!("{}/verify-email?token={}", self.verify_base_url, token);
        let body = format!(
            "Welcome!\n\n\
             Please confirm your email address by opening the link below:\n\n\
             {link}\n\n\
             The link is valid for 24 hours. If you did not create an account, \
             you can ignore this message.\n"
        );

        Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| MailerError(format!("Invalid sender address: {e}")))?,
            )
            .to(recipient
                .as_str()
                .parse()
                .map_err(|e| MailerError(format!("Invalid recipient address: {e}")))?)
            .subject("Confirm your email address")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailerError(format!("Failed to build email: {e}")))
    }
}

impl VerificationMailer for SmtpMailer {
    async fn send_verification(&self, recipient: &Email, token: &str) -> Result<(), MailerError> {
        let message = self.build_message(recipient, token)?;
        let transport = Arc::clone(&self.transport);

        let result = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailerError(format!("Email task panicked: {e}")))?;

        result.map_err(|e| MailerError(format!("SMTP send failed: {e}")))?;

        tracing::debug!(recipient = %recipient, "Verification email sent");
        Ok(())
    }
}

/// Development mailer that logs the verification link
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl VerificationMailer for LogMailer {
    async fn send_verification(&self, recipient: &Email, token: &str) -> Result<(), MailerError> {
        tracing::info!(
            recipient = %recipient,
            token = %token,
            "Verification email (log only)"
        );
        Ok(())
    }
}
