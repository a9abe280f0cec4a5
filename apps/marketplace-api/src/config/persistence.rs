//! Storage backend configuration.

use serde::{Deserialize, Serialize};

/// Which store backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local tables. Data is lost on restart.
    #[default]
    Memory,
    /// SQLite database through sqlx.
    Sqlite,
}

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: StorageBackend,
    /// sqlx connection URL, used by the sqlite backend.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Pool size for the sqlite backend.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://marketplace.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}
