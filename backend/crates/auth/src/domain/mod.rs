//! Domain Layer
//!
//! Contains entities, value objects, the resend throttle policy, and the
//! repository/mailer ports.

pub mod entity;
pub mod mailer;
pub mod repository;
pub mod throttle;
pub mod value_object;

// Re-exports
pub use entity::{Account, VerificationToken};
pub use mailer::{MailerError, VerificationMailer};
pub use repository::{AccountRepository, VerificationTokenRepository};
pub use throttle::ResendDecision;
