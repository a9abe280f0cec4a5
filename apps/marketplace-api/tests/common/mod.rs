//! Shared setup for the integration suites. Generic over the store so the
//! same scenarios run against memory and SQLite.

// Each suite uses a different subset of the helpers
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use marketplace_api::application::dto::{OrderItemDto, PlaceOrderRequestDto};
use marketplace_api::application::ports::{CatalogStore, MarketplaceStore, UserRepository};
use marketplace_api::application::use_cases::{
    OrderQueryUseCase, PlaceOrderUseCase, ProductUseCase, ShopUseCase, UpdateOrderStatusUseCase,
};
use marketplace_api::domain::catalog::{NewProduct, NewShop, Product, Shop};
use marketplace_api::domain::identity::{NewUser, Principal, Role};
use marketplace_api::domain::ordering::TransitionPolicy;
use marketplace_api::domain::shared::{Money, ProductId, ShopId};

pub struct Market<S: MarketplaceStore> {
    pub store: Arc<S>,
}

impl<S: MarketplaceStore> Market<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn user(&self, name: &str, role: Role) -> Principal {
        let user = self
            .store
            .insert_user(NewUser {
                email: format!("{name}@example.com"),
                name: name.to_string(),
                phone: "555-0100".to_string(),
                role,
                password_hash: "unused".to_string(),
            })
            .await
            .unwrap();
        Principal::new(user.id, user.role)
    }

    pub async fn customer(&self, name: &str) -> Principal {
        self.user(name, Role::Customer).await
    }

    pub async fn merchant_with_shop(&self, name: &str) -> (Principal, Shop) {
        let owner = self.user(name, Role::Shop).await;
        let new_shop = NewShop::new(
            owner.user_id,
            &format!("{name}'s"),
            String::new(),
            "Market Square".to_string(),
            String::new(),
        )
        .unwrap();
        let shop = self.store.insert_shop(new_shop).await.unwrap();
        (owner, shop)
    }

    pub async fn product(&self, shop: &Shop, cents: i64, stock: i64) -> Product {
        let new_product = NewProduct::new(
            shop.id,
            "Simit",
            String::new(),
            Money::from_cents(cents),
            stock,
            String::new(),
        )
        .unwrap();
        self.store.insert_product(new_product).await.unwrap()
    }

    pub async fn stock_of(&self, id: ProductId) -> u32 {
        self.store
            .get_product_including_deleted(id)
            .await
            .unwrap()
            .unwrap()
            .stock()
    }

    pub fn placer(&self) -> PlaceOrderUseCase<S> {
        PlaceOrderUseCase::new(Arc::clone(&self.store))
    }

    pub fn placer_with_attempts(&self, attempts: u32) -> PlaceOrderUseCase<S> {
        PlaceOrderUseCase::with_max_attempts(Arc::clone(&self.store), attempts)
    }

    pub fn queries(&self) -> OrderQueryUseCase<S> {
        OrderQueryUseCase::new(Arc::clone(&self.store))
    }

    pub fn status_updates(&self, policy: TransitionPolicy) -> UpdateOrderStatusUseCase<S> {
        UpdateOrderStatusUseCase::new(Arc::clone(&self.store), policy)
    }

    pub fn products(&self) -> ProductUseCase<S> {
        ProductUseCase::new(Arc::clone(&self.store))
    }

    pub fn shops(&self) -> ShopUseCase<S> {
        ShopUseCase::new(Arc::clone(&self.store))
    }
}

pub fn cart(shop_id: ShopId, items: &[(ProductId, u32)]) -> PlaceOrderRequestDto {
    PlaceOrderRequestDto {
        shop_id,
        items: items
            .iter()
            .map(|&(product_id, quantity)| OrderItemDto {
                product_id,
                quantity,
            })
            .collect(),
        note: None,
    }
}
