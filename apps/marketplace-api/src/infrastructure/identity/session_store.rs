//! Opaque bearer sessions.
//!
//! Tokens are 256 random bits, base64url encoded. Only the SHA-256 digest of
//! a token is kept, so a leaked session table cannot be replayed. The table
//! is keyed by that digest: lookup timing depends on digest bytes, never on
//! the presented token's bytes.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::application::ports::{AuthError, IdentityPort, IssuedToken};
use crate::domain::identity::Principal;

#[derive(Debug, Clone)]
struct Session {
    principal: Principal,
    expires_at: DateTime<Utc>,
}

/// In-process [`IdentityPort`]. Sessions do not survive a restart.
#[derive(Debug)]
pub struct SessionIdentityProvider {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionIdentityProvider {
    /// Create a provider whose tokens live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a provider whose tokens live for `hours`.
    #[must_use]
    pub fn with_ttl_hours(hours: u32) -> Self {
        Self::new(Duration::hours(i64::from(hours)))
    }

    /// Number of stored sessions, expired ones included until evicted.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.read().len()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned table is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn digest(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    fn lookup(&self, digest: &str) -> Option<Session> {
        self.read().get(digest).cloned()
    }

    fn evict(&self, digest: &str) {
        self.write().remove(digest);
    }
}

#[async_trait]
impl IdentityPort for SessionIdentityProvider {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let digest = Self::digest(token);
        let session = self.lookup(&digest).ok_or(AuthError::InvalidToken)?;

        if session.expires_at <= Utc::now() {
            self.evict(&digest);
            tracing::debug!(user_id = %session.principal.user_id, "Session expired");
            return Err(AuthError::InvalidToken);
        }
        Ok(session.principal)
    }

    async fn issue(&self, principal: Principal) -> Result<IssuedToken, AuthError> {
        let token = Self::generate_token();
        let digest = Self::digest(&token);
        let expires_at = Utc::now() + self.ttl;

        let now = Utc::now();
        let mut sessions = self.write();
        // Expired sessions are swept on every issue.
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            digest,
            Session {
                principal,
                expires_at,
            },
        );
        drop(sessions);

        Ok(IssuedToken { token, expires_at })
    }

    async fn revoke(&self, token: &str) {
        self.evict(&Self::digest(token.trim()));
    }
}
