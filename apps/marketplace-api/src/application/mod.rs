//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for storage, identity and password hashing
//! - **Use Cases**: Placement, order lifecycle, catalog and account operations
//! - **DTOs**: Data transfer objects for API boundaries

pub mod dto;
pub mod errors;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use errors::ServiceError;
pub use ports::*;
pub use use_cases::*;
