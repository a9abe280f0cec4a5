//! Application Ports (Driven Ports)
//!
//! Ports define how the application uses external systems: storage, the
//! identity provider, and password hashing.

mod identity_port;
mod password_port;
mod store_port;

#[cfg(test)]
pub use identity_port::MockIdentityPort;
pub use identity_port::{AuthError, IdentityPort, IssuedToken};
pub use password_port::PasswordHasherPort;
pub use store_port::{
    CatalogStore, MarketplaceStore, OrderRepository, StoreError, TransactionalStore, UnitOfWork,
    UserRepository,
};
