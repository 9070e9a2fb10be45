//! Infrastructure Layer
//!
//! Concrete adapters for the domain ports: Postgres persistence and email
//! delivery.

pub mod email;
pub mod postgres;

pub use email::{LogMailer, SmtpConfig, SmtpMailer};
pub use postgres::PgAuthRepository;
