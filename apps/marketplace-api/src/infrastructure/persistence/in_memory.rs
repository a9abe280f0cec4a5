//! In-memory marketplace store.
//!
//! Every table sits behind one async mutex. A unit of work holds the owned
//! guard for its whole life, so units run one at a time: the strongest
//! possible row lock. Writes are staged inside the unit and only reach the
//! tables on commit.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::application::ports::{
    CatalogStore, OrderRepository, StoreError, TransactionalStore, UnitOfWork, UserRepository,
};
use crate::domain::catalog::{NewProduct, NewShop, Product, Shop};
use crate::domain::identity::{NewUser, OrderScope, User};
use crate::domain::ordering::{Order, OrderDraft};
use crate::domain::shared::{OrderId, ProductId, ShopId, Timestamp, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    shops: BTreeMap<ShopId, Shop>,
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    sequences: Sequences,
}

/// Autoincrement counters. Ids consumed by a rolled-back unit are not reused.
#[derive(Debug, Default)]
struct Sequences {
    user: i64,
    shop: i64,
    product: i64,
    order: i64,
    order_line: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-memory implementation of every storage port.
///
/// Suitable for tests and development; nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    failing_commits: Arc<AtomicU32>,
    failing_user_reads: Arc<AtomicU32>,
}

/// Consume one injected failure, if any remain.
fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` commits fail with a backend error. The failing
    /// units are rolled back.
    pub fn fail_next_commits(&self, count: u32) {
        self.failing_commits.store(count, Ordering::SeqCst);
    }

    /// Make the next `count` user lookups by id fail with a backend error.
    pub fn fail_next_user_reads(&self, count: u32) {
        self.failing_user_reads.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email {}", user.email)));
        }
        let id = UserId::new(next(&mut tables.sequences.user));
        let user = user.into_user(id, Timestamp::now());
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        if take_one(&self.failing_user_reads) {
            return Err(StoreError::Backend("user read aborted".to_string()));
        }
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn get_shop(&self, id: ShopId) -> Result<Option<Shop>, StoreError> {
        Ok(self.tables.lock().await.shops.get(&id).cloned())
    }

    async fn find_shop_by_owner(&self, owner: UserId) -> Result<Option<Shop>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.shops.values().find(|s| s.owner_id == owner).cloned())
    }

    async fn list_active_shops(&self) -> Result<Vec<Shop>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.shops.values().filter(|s| s.is_active).cloned().collect())
    }

    async fn insert_shop(&self, shop: NewShop) -> Result<Shop, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.shops.values().any(|s| s.owner_id == shop.owner_id) {
            return Err(StoreError::Duplicate(format!("shop owner {}", shop.owner_id)));
        }
        let id = ShopId::new(next(&mut tables.sequences.shop));
        let shop = shop.into_shop(id, Timestamp::now());
        tables.shops.insert(id, shop.clone());
        Ok(shop)
    }

    async fn update_shop(&self, shop: &Shop) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.shops.get_mut(&shop.id) {
            Some(stored) => {
                *stored = shop.clone();
                Ok(())
            }
            None => Err(StoreError::Conflict(format!("shop {} vanished", shop.id))),
        }
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.products.get(&id).filter(|p| !p.is_deleted()).cloned())
    }

    async fn get_product_including_deleted(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, StoreError> {
        Ok(self.tables.lock().await.products.get(&id).cloned())
    }

    async fn list_active_products(
        &self,
        shop: Option<ShopId>,
    ) -> Result<Vec<Product>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .values()
            .filter(|p| p.is_active() && !p.is_deleted())
            .filter(|p| shop.is_none_or(|shop_id| p.shop_id() == shop_id))
            .cloned()
            .collect())
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut tables = self.tables.lock().await;
        let id = ProductId::new(next(&mut tables.sequences.product));
        let product = product.into_product(id, Timestamp::now());
        tables.products.insert(id, product.clone());
        Ok(product)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.tables.lock().await.orders.get(&id).cloned())
    }

    async fn list_orders(&self, scope: OrderScope) -> Result<Vec<Order>, StoreError> {
        let tables = self.tables.lock().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| scope.includes(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(orders)
    }

    async fn update_order_status(&self, order: &Order) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        let stored = tables
            .orders
            .get_mut(&order.id())
            .ok_or_else(|| StoreError::Conflict(format!("order {} vanished", order.id())))?;
        stored.change_status(order.status(), order.updated_at());
        Ok(())
    }
}

#[async_trait]
impl TransactionalStore for InMemoryStore {
    type Unit = InMemoryUnit;

    async fn begin(&self) -> Result<InMemoryUnit, StoreError> {
        Ok(InMemoryUnit {
            tables: Arc::clone(&self.tables).lock_owned().await,
            products: BTreeMap::new(),
            orders: Vec::new(),
            failing_commits: Arc::clone(&self.failing_commits),
        })
    }
}

/// Unit of work over [`InMemoryStore`]. Holds the store lock until it is
/// committed, rolled back, or dropped.
#[derive(Debug)]
pub struct InMemoryUnit {
    tables: OwnedMutexGuard<Tables>,
    products: BTreeMap<ProductId, Product>,
    orders: Vec<Order>,
    failing_commits: Arc<AtomicU32>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnit {
    async fn get_product(&mut self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let product = self
            .products
            .get(&id)
            .or_else(|| self.tables.products.get(&id));
        Ok(product.filter(|p| !p.is_deleted()).cloned())
    }

    async fn save_product(&mut self, product: &Product) -> Result<(), StoreError> {
        if !self.tables.products.contains_key(&product.id()) {
            return Err(StoreError::Conflict(format!(
                "product {} vanished",
                product.id()
            )));
        }
        self.products.insert(product.id(), product.clone());
        Ok(())
    }

    async fn insert_order(&mut self, draft: &OrderDraft) -> Result<Order, StoreError> {
        let sequences = &mut self.tables.sequences;
        let id = OrderId::new(next(&mut sequences.order));
        let first_line_id = sequences.order_line + 1;
        sequences.order_line += i64::try_from(draft.lines().len())
            .map_err(|_| StoreError::Backend("too many order lines".to_string()))?;

        let order = draft.clone().into_order(id, first_line_id, Timestamp::now());
        self.orders.push(order.clone());
        Ok(order)
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        if take_one(&self.failing_commits) {
            return Err(StoreError::Backend("commit aborted".to_string()));
        }
        let products = std::mem::take(&mut self.products);
        self.tables.products.extend(products);
        for order in std::mem::take(&mut self.orders) {
            self.tables.orders.insert(order.id(), order);
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}
