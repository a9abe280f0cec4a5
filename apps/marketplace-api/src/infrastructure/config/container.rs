//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::ports::{AuthError, MarketplaceStore, PasswordHasherPort, StoreError};
use crate::application::use_cases::{
    AccountPolicy, AccountUseCase, OrderQueryUseCase, PlaceOrderUseCase, ProductUseCase,
    ShopUseCase, UpdateOrderStatusUseCase,
};
use crate::config::{AuthConfig, Config, OrdersConfig, PersistenceConfig};
use crate::infrastructure::http::AppState;
use crate::infrastructure::identity::{Argon2PasswordHasher, HashCost, SessionIdentityProvider};
use crate::infrastructure::persistence::SqliteStore;

/// Dependency injection container.
///
/// Holds the store, identity provider and hasher, and builds use cases over
/// them. The store type is chosen at startup, so the container is generic
/// over it.
pub struct Container<S>
where
    S: MarketplaceStore,
{
    store: Arc<S>,
    identity: Arc<SessionIdentityProvider>,
    hasher: Arc<dyn PasswordHasherPort>,
    account_policy: AccountPolicy,
    orders: OrdersConfig,
}

impl<S> Container<S>
where
    S: MarketplaceStore,
{
    /// Wire a container around `store` using the auth and orders sections.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Hashing` if the configured Argon2 cost is rejected.
    pub fn new(store: Arc<S>, config: &Config) -> Result<Self, AuthError> {
        let hasher = Argon2PasswordHasher::new(hash_cost(&config.auth))?;
        Ok(Self {
            store,
            identity: Arc::new(SessionIdentityProvider::with_ttl_hours(
                config.auth.session_ttl_hours,
            )),
            hasher: Arc::new(hasher),
            account_policy: AccountPolicy {
                min_password_length: config.auth.min_password_length,
                allow_admin_registration: config.auth.allow_admin_registration,
            },
            orders: config.orders.clone(),
        })
    }

    /// Get the store.
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Get the identity provider.
    pub fn identity(&self) -> Arc<SessionIdentityProvider> {
        Arc::clone(&self.identity)
    }

    /// Create an `AccountUseCase`.
    pub fn account_use_case(&self) -> AccountUseCase<S, SessionIdentityProvider> {
        AccountUseCase::new(
            Arc::clone(&self.store),
            Arc::clone(&self.identity),
            Arc::clone(&self.hasher),
            self.account_policy,
        )
    }

    /// Create a `ShopUseCase`.
    pub fn shop_use_case(&self) -> ShopUseCase<S> {
        ShopUseCase::new(Arc::clone(&self.store))
    }

    /// Create a `ProductUseCase`.
    pub fn product_use_case(&self) -> ProductUseCase<S> {
        ProductUseCase::new(Arc::clone(&self.store))
    }

    /// Create a `PlaceOrderUseCase`.
    pub fn place_order_use_case(&self) -> PlaceOrderUseCase<S> {
        PlaceOrderUseCase::with_max_attempts(
            Arc::clone(&self.store),
            self.orders.max_placement_attempts,
        )
    }

    /// Create an `OrderQueryUseCase`.
    pub fn order_query_use_case(&self) -> OrderQueryUseCase<S> {
        OrderQueryUseCase::new(Arc::clone(&self.store))
    }

    /// Create an `UpdateOrderStatusUseCase`.
    pub fn update_order_status_use_case(&self) -> UpdateOrderStatusUseCase<S> {
        UpdateOrderStatusUseCase::new(Arc::clone(&self.store), self.orders.transition_policy)
    }

    /// Build the HTTP state with one instance of every use case.
    pub fn app_state(&self) -> AppState<S, SessionIdentityProvider> {
        AppState {
            accounts: Arc::new(self.account_use_case()),
            shops: Arc::new(self.shop_use_case()),
            products: Arc::new(self.product_use_case()),
            place_order: Arc::new(self.place_order_use_case()),
            order_queries: Arc::new(self.order_query_use_case()),
            update_order_status: Arc::new(self.update_order_status_use_case()),
            identity: Arc::clone(&self.identity),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Open the SQLite store described by `config`.
///
/// # Errors
///
/// Returns `StoreError::Backend` if the database cannot be opened.
pub async fn connect_sqlite(config: &PersistenceConfig) -> Result<SqliteStore, StoreError> {
    SqliteStore::connect(&config.database_url, config.max_connections).await
}

const fn hash_cost(auth: &AuthConfig) -> HashCost {
    HashCost {
        memory_kib: auth.hash_memory_kib,
        iterations: auth.hash_iterations,
    }
}
