//! Authenticated principal.

use serde::{Deserialize, Serialize};

use super::Role;
use crate::domain::shared::UserId;

/// The authenticated caller of an operation: who they are and what role they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account identifier.
    pub user_id: UserId,
    /// Role held by the account.
    pub role: Role,
}

impl Principal {
    /// Create a principal.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns true if this principal holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
