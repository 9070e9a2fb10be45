//! Domain Entities

pub mod account;
pub mod verification_token;

pub use account::Account;
pub use verification_token::VerificationToken;
