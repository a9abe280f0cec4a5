//! Account DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::identity::{Role, User};
use crate::domain::shared::{Timestamp, UserId};

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDto {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Requested role; defaults to `customer`.
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginDto {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Account profile. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    /// Account id.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Role.
    pub role: Role,
    /// Registration time.
    pub created_at: Timestamp,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Customer summary embedded in order responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummaryDto {
    /// Account id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
}

impl From<&User> for UserSummaryDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Successful register or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponseDto {
    /// Bearer token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The authenticated account.
    pub user: UserDto,
}
