//! Identity Port (Driven Port)
//!
//! Turns bearer credentials into an authenticated [`Principal`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::identity::Principal;

/// Authentication failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was presented.
    #[error("authentication required")]
    Unauthenticated,

    /// The credential is unknown, malformed or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Email and password do not match an account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Another account already uses this email.
    #[error("email already registered")]
    EmailTaken,

    /// The password hasher failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// A freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Opaque token to present as `Authorization: Bearer <token>`.
    pub token: String,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

/// Identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityPort: Send + Sync + 'static {
    /// Resolve a bearer token to the principal it was issued for.
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;

    /// Issue a new token for `principal`.
    async fn issue(&self, principal: Principal) -> Result<IssuedToken, AuthError>;

    /// Revoke a token. Unknown tokens are ignored.
    async fn revoke(&self, token: &str);
}
