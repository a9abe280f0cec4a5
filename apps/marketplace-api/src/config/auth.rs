//! Account and session configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session lifetime in hours.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
    /// Minimum password length at registration.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Whether `role: admin` may be requested at registration.
    #[serde(default)]
    pub allow_admin_registration: bool,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,
    /// Argon2 passes.
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            min_password_length: default_min_password_length(),
            allow_admin_registration: false,
            hash_memory_kib: default_hash_memory_kib(),
            hash_iterations: default_hash_iterations(),
        }
    }
}

const fn default_session_ttl_hours() -> u32 {
    24
}

pub(crate) const fn default_min_password_length() -> usize {
    6
}

// argon2's recommended defaults (19 MiB, 2 passes).
const fn default_hash_memory_kib() -> u32 {
    19 * 1024
}

const fn default_hash_iterations() -> u32 {
    2
}
