//! Auth Configuration

use std::time::Duration;

/// Default session lifetime: one hour
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Runtime configuration for the auth subsystem
///
/// The signing key is injected, never read from a global, so tests and
/// multi-tenant deployments can each carry their own.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for session token signing
    token_secret: [u8; 32],
    /// Session token lifetime
    session_ttl: Duration,
    /// Optional server-side pepper mixed into password hashing
    password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    pub fn new(token_secret: [u8; 32]) -> Self {
        Self {
            token_secret,
            session_ttl: DEFAULT_SESSION_TTL,
            password_pepper: None,
        }
    }

    /// Generate a throwaway random secret
    ///
    /// Sessions do not survive a restart with this; production supplies a
    /// stable secret via environment instead.
    pub fn with_random_secret() -> Self {
        Self::new(platform::crypto::random_key())
    }

    /// Development preset: random secret, default TTL, no pepper
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn password_pepper(mut self, pepper: Vec<u8>) -> Self {
        self.password_pepper = Some(pepper);
        self
    }

    pub fn token_secret(&self) -> &[u8; 32] {
        &self.token_secret
    }

    pub fn ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("session_ttl", &self.session_ttl)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
