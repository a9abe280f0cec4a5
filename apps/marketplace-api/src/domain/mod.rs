//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business logic
//!
//! # Bounded Contexts
//!
//! - [`identity`]: Roles, principals and access-control predicates
//! - [`catalog`]: Shops and products with their stock counters
//! - [`ordering`]: Order placement rules and the status lifecycle

pub mod catalog;
pub mod identity;
pub mod ordering;
pub mod shared;
