// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Marketplace API - Rust Core Library
//!
//! Backend for a neighborhood marketplace: merchants run shops, customers
//! place orders against them, and merchants drive each order through its
//! status lifecycle.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, access rules)
//!   - `identity`: Roles, principals, access-control predicates
//!   - `catalog`: Shops and products with their stock counters
//!   - `ordering`: Order draft, lifecycle state machine, transition policy
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`MarketplaceStore`, `IdentityPort`)
//!   - `use_cases`: `PlaceOrder`, `UpdateOrderStatus`, order queries, catalog, accounts
//!   - `dto`: Data transfer objects for API boundaries
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: In-memory and SQLite stores
//!   - `identity`: Bearer sessions, Argon2 hashing
//!   - `http`: axum REST API
//!   - `config`: Dependency injection container
//!
//! # Order Placement
//!
//! Placement is one unit of work: every line is checked and its stock
//! decremented inside it, and any failure rolls the whole unit back. Stock
//! never goes negative under concurrent placements.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration with environment interpolation.
pub mod config;

/// HTTP error codes and response bodies.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::identity::{Principal, Role};
pub use domain::ordering::{Order, OrderStatus, TransitionPolicy};
pub use domain::shared::{Money, OrderId, ProductId, ShopId, Timestamp, UserId};

// Application re-exports
pub use application::dto::{OrderDetailsDto, PlaceOrderRequestDto, UpdateOrderStatusDto};
pub use application::errors::ServiceError;
pub use application::ports::{MarketplaceStore, StoreError};
pub use application::use_cases::{PlaceOrderUseCase, UpdateOrderStatusUseCase};

// Infrastructure re-exports
pub use infrastructure::config::Container;
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::persistence::{InMemoryStore, SqliteStore};
