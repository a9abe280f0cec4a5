//! SQLite store behavior: durability, constraints, soft deletes and
//! stock accounting under concurrent placements.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use tempfile::TempDir;

use common::{Market, cart};
use marketplace_api::application::dto::{CreateShopDto, OrderDetailsDto, UpdateOrderStatusDto};
use marketplace_api::application::errors::ServiceError;
use marketplace_api::application::ports::{CatalogStore, OrderRepository, UserRepository};
use marketplace_api::domain::catalog::{CatalogError, Shop};
use marketplace_api::domain::identity::OrderScope;
use marketplace_api::domain::ordering::{OrderError, OrderStatus, TransitionPolicy};
use marketplace_api::domain::shared::{Money, ProductId};
use marketplace_api::infrastructure::persistence::SqliteStore;

async fn open(dir: &TempDir) -> SqliteStore {
    let path = dir.path().join("marketplace.db");
    SqliteStore::connect(&format!("sqlite://{}", path.display()), 5)
        .await
        .unwrap()
}

#[tokio::test]
async fn orders_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let (order_id, customer_id, bread_id) = {
        let market = Market::new(Arc::new(open(&dir).await));
        let (_, shop) = market.merchant_with_shop("baker").await;
        let bread = market.product(&shop, 350, 8).await;
        let customer = market.customer("ayse").await;
        let order = market
            .placer()
            .execute(&customer, cart(shop.id, &[(bread.id(), 3)]))
            .await
            .unwrap();
        (order.id, customer.user_id, bread.id())
    };

    let store = open(&dir).await;
    let order = store.find_order(order_id).await.unwrap().unwrap();
    assert_eq!(order.user_id(), customer_id);
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.total_amount(), Money::from_cents(1050));
    assert_eq!(order.lines().len(), 1);
    assert_eq!(order.lines()[0].price, Money::from_cents(350));

    let bread = store.get_product(bread_id).await.unwrap().unwrap();
    assert_eq!(bread.stock(), 5);
    assert!(store.find_user(customer_id).await.unwrap().is_some());
}

#[tokio::test]
async fn second_shop_for_same_owner_is_rejected() {
    let dir = TempDir::new().unwrap();
    let market = Market::new(Arc::new(open(&dir).await));
    let (owner, _) = market.merchant_with_shop("grocer").await;

    let err = market
        .shops()
        .create_shop(
            &owner,
            CreateShopDto {
                name: "Second".to_string(),
                description: String::new(),
                address: String::new(),
                phone: String::new(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ServiceError::Catalog(CatalogError::ShopAlreadyExists {
            user_id: owner.user_id
        })
    );
}

#[tokio::test]
async fn duplicate_email_is_rejected_by_the_store() {
    let dir = TempDir::new().unwrap();
    let market = Market::new(Arc::new(open(&dir).await));
    market.customer("deniz").await;

    let user = market
        .store
        .find_user_by_email("deniz@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "deniz");

    let dup = market
        .store
        .insert_user(marketplace_api::domain::identity::NewUser {
            email: "deniz@example.com".to_string(),
            name: "other".to_string(),
            phone: String::new(),
            role: marketplace_api::Role::Customer,
            password_hash: "x".to_string(),
        })
        .await;
    assert!(matches!(
        dup,
        Err(marketplace_api::StoreError::Duplicate(_))
    ));
}

#[tokio::test]
async fn soft_deleted_products_vanish_from_catalog_but_not_from_orders() {
    let dir = TempDir::new().unwrap();
    let market = Market::new(Arc::new(open(&dir).await));
    let (owner, shop) = market.merchant_with_shop("potter").await;
    let bowl = market.product(&shop, 1200, 4).await;
    let customer = market.customer("kerem").await;
    let order = market
        .placer()
        .execute(&customer, cart(shop.id, &[(bowl.id(), 1)]))
        .await
        .unwrap();

    market.products().delete_product(&owner, bowl.id()).await.unwrap();

    assert!(market.store.get_product(bowl.id()).await.unwrap().is_none());
    assert!(
        market
            .store
            .list_active_products(Some(shop.id))
            .await
            .unwrap()
            .is_empty()
    );

    let details = market.queries().get_order(&customer, order.id).await.unwrap();
    let product = details.items[0].product.as_ref().unwrap();
    assert!(product.deleted);
    assert_eq!(details.items[0].price, Money::from_cents(1200));

    let err = market
        .placer()
        .execute(&customer, cart(shop.id, &[(bowl.id(), 1)]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Order(OrderError::ProductNotFound {
            product_id: bowl.id()
        })
    );
}

#[tokio::test]
async fn status_changes_are_persisted() {
    let dir = TempDir::new().unwrap();
    let market = Market::new(Arc::new(open(&dir).await));
    let (owner, shop) = market.merchant_with_shop("cook").await;
    let dish = market.product(&shop, 800, 2).await;
    let customer = market.customer("nil").await;
    let order = market
        .placer()
        .execute(&customer, cart(shop.id, &[(dish.id(), 1)]))
        .await
        .unwrap();

    market
        .status_updates(TransitionPolicy::Permissive)
        .execute(
            &owner,
            order.id,
            UpdateOrderStatusDto {
                status: "ready".to_string(),
            },
        )
        .await
        .unwrap();

    let stored = market.store.find_order(order.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), OrderStatus::Ready);
    assert!(stored.updated_at() >= stored.created_at());

    let for_shop = market.store.list_orders(OrderScope::Shop(shop.id)).await.unwrap();
    assert_eq!(for_shop.len(), 1);
}

/// Spawn one single-line placement per customer at default attempts.
async fn place_concurrently(
    market: &Market<SqliteStore>,
    shop: &Shop,
    product: ProductId,
    customers: usize,
    quantity: u32,
) -> Vec<Result<OrderDetailsDto, ServiceError>> {
    let placer = Arc::new(market.placer());
    let mut handles = Vec::new();
    for i in 0..customers {
        let customer = market.customer(&format!("c{i}")).await;
        let placer = Arc::clone(&placer);
        let request = cart(shop.id, &[(product, quantity)]);
        handles.push(tokio::spawn(async move {
            placer.execute(&customer, request).await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }
    outcomes
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_placements_with_ample_stock_all_succeed() {
    let dir = TempDir::new().unwrap();
    let market = Market::new(Arc::new(open(&dir).await));
    let (_, shop) = market.merchant_with_shop("flour").await;
    let sack = market.product(&shop, 1200, 1000).await;

    let outcomes = place_concurrently(&market, &shop, sack.id(), 16, 2).await;

    for outcome in &outcomes {
        assert!(outcome.is_ok(), "placement failed: {outcome:?}");
    }
    assert_eq!(market.stock_of(sack.id()).await, 1000 - 16 * 2);
    let orders = market.store.list_orders(OrderScope::All).await.unwrap();
    assert_eq!(orders.len(), 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_placements_conserve_stock() {
    const INITIAL: u32 = 6;

    let dir = TempDir::new().unwrap();
    let market = Market::new(Arc::new(open(&dir).await));
    let (_, shop) = market.merchant_with_shop("cheese").await;
    let wheel = market.product(&shop, 2500, i64::from(INITIAL)).await;

    let outcomes = place_concurrently(&market, &shop, wheel.id(), 12, 1).await;

    let mut sold = 0;
    let mut refused = 0;
    for outcome in outcomes {
        match outcome {
            Ok(order) => sold += order.items[0].quantity,
            Err(ServiceError::Order(OrderError::InsufficientStock { .. })) => refused += 1,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(sold, INITIAL);
    assert_eq!(refused, 12 - INITIAL);
    assert_eq!(market.stock_of(wheel.id()).await, 0);

    let orders = market.store.list_orders(OrderScope::All).await.unwrap();
    assert_eq!(orders.len() as u32, sold);
}
