//! Identity Adapters
//!
//! Session-based implementation of the identity port and Argon2 password
//! hashing.

pub mod password;
pub mod session_store;

pub use password::{Argon2PasswordHasher, HashCost};
pub use session_store::SessionIdentityProvider;
