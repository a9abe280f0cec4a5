//! User account entity.

use super::Role;
use crate::domain::shared::{Timestamp, UserId};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Unique login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Contact phone, possibly empty.
    pub phone: String,
    /// Role held by the account.
    pub role: Role,
    /// PHC-format password hash.
    pub password_hash: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

/// Insertion form of a [`User`]; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Contact phone, possibly empty.
    pub phone: String,
    /// Role held by the account.
    pub role: Role,
    /// PHC-format password hash.
    pub password_hash: String,
}

impl NewUser {
    /// Materialize the account with a storage-assigned id.
    #[must_use]
    pub fn into_user(self, id: UserId, now: Timestamp) -> User {
        User {
            id,
            email: self.email,
            name: self.name,
            phone: self.phone,
            role: self.role,
            password_hash: self.password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
