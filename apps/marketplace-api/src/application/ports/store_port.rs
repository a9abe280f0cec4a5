//! Store Ports (Driven Ports)
//!
//! Persistence interfaces for accounts, the catalog and orders, plus the
//! unit-of-work contract the placement transaction runs inside.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::catalog::{NewProduct, NewShop, Product, Shop};
use crate::domain::identity::{NewUser, OrderScope, User};
use crate::domain::ordering::{Order, OrderDraft};
use crate::domain::shared::{OrderId, ProductId, ShopId, UserId};

/// Storage-layer failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A concurrent writer got there first (lost compare-and-set, busy
    /// database). Re-running the unit of work may succeed.
    #[error("storage conflict: {0}")]
    Conflict(String),

    /// A uniqueness constraint rejected the write.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// The backend failed (I/O, driver, commit aborted).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored row could not be decoded into a domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether re-running the whole unit of work may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Backend(_))
    }

    /// Short label used in metrics and logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "conflict",
            Self::Duplicate(_) => "duplicate",
            Self::Backend(_) => "backend",
            Self::Corrupt(_) => "corrupt",
        }
    }
}

/// Account storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account. Fails `Duplicate` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Find an account by id.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Find an account by login email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Shop and product storage outside of a unit of work.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Get a shop by id.
    async fn get_shop(&self, id: ShopId) -> Result<Option<Shop>, StoreError>;

    /// Get the shop owned by `owner`, if any.
    async fn find_shop_by_owner(&self, owner: UserId) -> Result<Option<Shop>, StoreError>;

    /// List active shops, oldest first.
    async fn list_active_shops(&self) -> Result<Vec<Shop>, StoreError>;

    /// Insert a shop. Fails `Duplicate` when the owner already has one.
    async fn insert_shop(&self, shop: NewShop) -> Result<Shop, StoreError>;

    /// Overwrite an existing shop.
    async fn update_shop(&self, shop: &Shop) -> Result<(), StoreError>;

    /// Get a product by id. Soft-deleted products are not returned.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Get a product by id, soft-deleted or not.
    async fn get_product_including_deleted(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, StoreError>;

    /// List active, non-deleted products, optionally for one shop, oldest first.
    async fn list_active_products(&self, shop: Option<ShopId>)
    -> Result<Vec<Product>, StoreError>;

    /// Insert a product.
    ///
    /// Existing products are only rewritten through a [`UnitOfWork`] so
    /// owner edits cannot overwrite a concurrent stock decrement.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;
}

/// Order storage outside of a unit of work.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order with its lines.
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// List orders inside `scope`, newest first.
    async fn list_orders(&self, scope: OrderScope) -> Result<Vec<Order>, StoreError>;

    /// Persist a status change (status and `updated_at` only).
    async fn update_order_status(&self, order: &Order) -> Result<(), StoreError>;
}

/// An atomic, all-or-nothing group of reads and writes.
///
/// Nothing written through a unit is visible to other readers until
/// [`UnitOfWork::commit`] succeeds. Dropping a unit without committing
/// discards its writes.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Load a product inside the unit. Soft-deleted products are not returned.
    async fn get_product(&mut self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Stage an updated product row.
    async fn save_product(&mut self, product: &Product) -> Result<(), StoreError>;

    /// Stage an order with its lines; the order starts `pending`.
    ///
    /// Returns the order as it will read back once the unit commits.
    async fn insert_order(&mut self, draft: &OrderDraft) -> Result<Order, StoreError>;

    /// Make every staged write durable and visible at once.
    async fn commit(self) -> Result<(), StoreError>;

    /// Discard every staged write.
    async fn rollback(self) -> Result<(), StoreError>;
}

/// Opens units of work.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    /// Unit of work type produced by this store.
    type Unit: UnitOfWork + 'static;

    /// Begin a unit of work.
    async fn begin(&self) -> Result<Self::Unit, StoreError>;
}

/// Everything the application needs from storage.
pub trait MarketplaceStore:
    UserRepository + CatalogStore + OrderRepository + TransactionalStore + 'static
{
}

impl<T> MarketplaceStore for T where
    T: UserRepository + CatalogStore + OrderRepository + TransactionalStore + 'static
{
}
