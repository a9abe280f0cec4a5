//! Shared fixtures for use case tests.

use std::sync::Arc;

use crate::application::ports::{
    CatalogStore, OrderRepository, TransactionalStore, UnitOfWork, UserRepository,
};
use crate::domain::catalog::{
    NewProduct, NewShop, Product, ProductChanges, ProductRecord, Shop,
};
use crate::domain::identity::{NewUser, OrderScope, Principal, Role};
use crate::domain::shared::{Money, ProductId, Timestamp};
use crate::infrastructure::persistence::InMemoryStore;

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
        }
    }

    pub async fn user(&self, name: &str, role: Role) -> Principal {
        let user = self
            .store
            .insert_user(NewUser {
                email: format!("{name}@example.com"),
                name: name.to_string(),
                phone: String::new(),
                role,
                password_hash: "unused".to_string(),
            })
            .await
            .unwrap();
        Principal::new(user.id, user.role)
    }

    pub async fn shop(&self, owner: &Principal) -> Shop {
        let new_shop = NewShop::new(
            owner.user_id,
            &format!("Shop of {}", owner.user_id),
            String::new(),
            "1 Market St".to_string(),
            String::new(),
        )
        .unwrap();
        self.store.insert_shop(new_shop).await.unwrap()
    }

    pub async fn product(&self, shop: &Shop, price: Money, stock: i64) -> Product {
        let new_product =
            NewProduct::new(shop.id, "Item", String::new(), price, stock, String::new()).unwrap();
        self.store.insert_product(new_product).await.unwrap()
    }

    pub async fn edit_product(&self, id: ProductId, changes: ProductChanges) {
        let mut unit = self.store.begin().await.unwrap();
        let mut product = unit.get_product(id).await.unwrap().unwrap();
        product.apply_changes(changes, Timestamp::now()).unwrap();
        unit.save_product(&product).await.unwrap();
        unit.commit().await.unwrap();
    }

    /// Overwrite a stored price without catalog validation, as a row
    /// written by an older release might hold.
    pub async fn store_raw_price(&self, id: ProductId, price: Money) {
        let mut unit = self.store.begin().await.unwrap();
        let product = unit.get_product(id).await.unwrap().unwrap();
        let record = ProductRecord {
            price,
            ..product.to_record()
        };
        unit.save_product(&Product::reconstitute(record)).await.unwrap();
        unit.commit().await.unwrap();
    }

    pub async fn stock_of(&self, id: ProductId) -> u32 {
        self.store
            .get_product_including_deleted(id)
            .await
            .unwrap()
            .unwrap()
            .stock()
    }

    pub async fn order_count(&self) -> usize {
        self.store.list_orders(OrderScope::All).await.unwrap().len()
    }
}
