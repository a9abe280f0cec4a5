//! Persistence Adapters
//!
//! Storage implementations of the store ports: an in-memory store for tests
//! and development, and a SQLite store for deployments.

pub mod in_memory;
pub mod sqlite;

pub use in_memory::{InMemoryStore, InMemoryUnit};
pub use sqlite::{SqliteStore, SqliteUnit};
