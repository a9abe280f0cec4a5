//! Password Hasher Port (Driven Port)

use super::AuthError;

/// One-way password hashing.
pub trait PasswordHasherPort: Send + Sync {
    /// Hash a plaintext password into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
