//! Order placement and lifecycle against the in-memory store.
//!
//! Covers the properties a caller can observe: no oversell under
//! concurrency, all-or-nothing placement, frozen prices, per-role
//! visibility, and the status lifecycle.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use common::{Market, cart};
use marketplace_api::application::dto::{UpdateOrderStatusDto, UpdateProductDto};
use marketplace_api::application::errors::ServiceError;
use marketplace_api::application::ports::{OrderRepository, StoreError};
use marketplace_api::domain::identity::{AccessError, OrderScope};
use marketplace_api::domain::ordering::{OrderError, OrderStatus, TransitionPolicy};
use marketplace_api::domain::shared::Money;
use marketplace_api::infrastructure::persistence::InMemoryStore;

fn market() -> Market<InMemoryStore> {
    Market::new(Arc::new(InMemoryStore::new()))
}

fn status(value: &str) -> UpdateOrderStatusDto {
    UpdateOrderStatusDto {
        status: value.to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_placements_never_oversell() {
    let market = market();
    let (_, shop) = market.merchant_with_shop("baker").await;
    let bread = market.product(&shop, 250, 10).await;

    let placer = Arc::new(market.placer());
    let mut handles = Vec::new();
    for i in 0..25 {
        let customer = market.customer(&format!("c{i}")).await;
        let placer = Arc::clone(&placer);
        let request = cart(shop.id, &[(bread.id(), 1)]);
        handles.push(tokio::spawn(async move {
            placer.execute(&customer, request).await
        }));
    }

    let mut placed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(ServiceError::Order(OrderError::InsufficientStock { available, .. })) => {
                assert_eq!(available, 0);
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(placed, 10);
    assert_eq!(market.stock_of(bread.id()).await, 0);
    let orders = market.store.list_orders(OrderScope::All).await.unwrap();
    assert_eq!(orders.len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn opposite_line_orders_do_not_deadlock() {
    let market = market();
    let (_, shop) = market.merchant_with_shop("grocer").await;
    let tea = market.product(&shop, 100, 40).await;
    let sugar = market.product(&shop, 50, 40).await;

    let placer = Arc::new(market.placer());
    let mut handles = Vec::new();
    for i in 0..20 {
        let customer = market.customer(&format!("c{i}")).await;
        let lines = if i % 2 == 0 {
            [(tea.id(), 1), (sugar.id(), 2)]
        } else {
            [(sugar.id(), 2), (tea.id(), 1)]
        };
        let placer = Arc::clone(&placer);
        let request = cart(shop.id, &lines);
        handles.push(tokio::spawn(async move {
            placer.execute(&customer, request).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(market.stock_of(tea.id()).await, 20);
    assert_eq!(market.stock_of(sugar.id()).await, 0);
}

#[tokio::test]
async fn failed_line_leaves_no_trace() {
    let market = market();
    let (_, shop) = market.merchant_with_shop("florist").await;
    let rose = market.product(&shop, 300, 5).await;
    let tulip = market.product(&shop, 200, 1).await;
    let customer = market.customer("ali").await;

    let err = market
        .placer()
        .execute(&customer, cart(shop.id, &[(rose.id(), 4), (tulip.id(), 2)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ServiceError::Order(OrderError::InsufficientStock {
            product_id: tulip.id(),
            requested: 2,
            available: 1,
        })
    );
    assert_eq!(market.stock_of(rose.id()).await, 5);
    assert_eq!(market.stock_of(tulip.id()).await, 1);
    assert!(market.store.list_orders(OrderScope::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn aborted_commits_surface_as_retryable_persistence_failure() {
    let market = market();
    let (_, shop) = market.merchant_with_shop("butcher").await;
    let lamb = market.product(&shop, 1500, 3).await;
    let customer = market.customer("zeynep").await;
    market.store.fail_next_commits(10);

    let err = market
        .placer_with_attempts(2)
        .execute(&customer, cart(shop.id, &[(lamb.id(), 1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Persistence(StoreError::Backend(_))));
    assert!(err.is_retryable());
    assert_eq!(market.stock_of(lamb.id()).await, 3);
}

#[tokio::test]
async fn line_prices_stay_frozen_after_catalog_edits() {
    let market = market();
    let (owner, shop) = market.merchant_with_shop("potter").await;
    let vase = market.product(&shop, 1000, 5).await;
    let customer = market.customer("mehmet").await;

    let order = market
        .placer()
        .execute(&customer, cart(shop.id, &[(vase.id(), 2)]))
        .await
        .unwrap();

    market
        .products()
        .update_product(
            &owner,
            vase.id(),
            UpdateProductDto {
                price: Some(Money::from_cents(1800)),
                ..UpdateProductDto::default()
            },
        )
        .await
        .unwrap();
    market.products().delete_product(&owner, vase.id()).await.unwrap();

    let reloaded = market.queries().get_order(&customer, order.id).await.unwrap();
    assert_eq!(reloaded.total_amount, Money::from_cents(2000));
    assert_eq!(reloaded.items[0].price, Money::from_cents(1000));
    let product = reloaded.items[0].product.as_ref().unwrap();
    assert_eq!(product.current_price, Money::from_cents(1800));
    assert!(product.deleted);
}

#[tokio::test]
async fn orders_are_visible_only_to_their_parties() {
    let market = market();
    let (owner, shop) = market.merchant_with_shop("tailor").await;
    let (rival, _) = market.merchant_with_shop("rival").await;
    let shirt = market.product(&shop, 4000, 5).await;
    let buyer = market.customer("buyer").await;
    let stranger = market.customer("stranger").await;
    let admin = market.user("root", marketplace_api::Role::Admin).await;

    let order = market
        .placer()
        .execute(&buyer, cart(shop.id, &[(shirt.id(), 1)]))
        .await
        .unwrap();
    let queries = market.queries();

    for allowed in [&buyer, &owner, &admin] {
        assert_eq!(queries.get_order(allowed, order.id).await.unwrap().id, order.id);
    }
    for denied in [&stranger, &rival] {
        assert!(matches!(
            queries.get_order(denied, order.id).await,
            Err(ServiceError::Access(AccessError::Forbidden { .. }))
        ));
    }

    assert_eq!(queries.list_orders(&buyer).await.unwrap().len(), 1);
    assert!(queries.list_orders(&stranger).await.unwrap().is_empty());
    assert!(queries.list_orders(&rival).await.unwrap().is_empty());
    assert_eq!(queries.list_orders(&owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn strict_lifecycle_walks_forward_to_delivery() {
    let market = market();
    let (owner, shop) = market.merchant_with_shop("cook").await;
    let soup = market.product(&shop, 600, 5).await;
    let customer = market.customer("elif").await;
    let order = market
        .placer()
        .execute(&customer, cart(shop.id, &[(soup.id(), 1)]))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let updates = market.status_updates(TransitionPolicy::Strict);
    for next in ["confirmed", "preparing", "ready", "delivered"] {
        let updated = updates.execute(&owner, order.id, status(next)).await.unwrap();
        assert_eq!(updated.status.as_str(), next);
    }

    let err = updates
        .execute(&owner, order.id, status("cancelled"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Order(OrderError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
        })
    ));
}

#[tokio::test]
async fn customers_cannot_change_status() {
    let market = market();
    let (_, shop) = market.merchant_with_shop("cobbler").await;
    let boots = market.product(&shop, 9000, 2).await;
    let customer = market.customer("can").await;
    let order = market
        .placer()
        .execute(&customer, cart(shop.id, &[(boots.id(), 1)]))
        .await
        .unwrap();

    let err = market
        .status_updates(TransitionPolicy::Permissive)
        .execute(&customer, order.id, status("cancelled"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Access(_)));
    let stored = market.store.find_order(order.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), OrderStatus::Pending);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn total_is_sum_of_frozen_subtotals(
        lines in prop::collection::vec((1i64..50_000, 1u32..20), 1..6)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let market = market();
            let (_, shop) = market.merchant_with_shop("stall").await;
            let customer = market.customer("shopper").await;

            let mut items = Vec::new();
            let mut expected_cents = 0i64;
            for &(cents, quantity) in &lines {
                let product = market.product(&shop, cents, 100).await;
                items.push((product.id(), quantity));
                expected_cents += cents * i64::from(quantity);
            }

            let order = market
                .placer()
                .execute(&customer, cart(shop.id, &items))
                .await
                .unwrap();

            prop_assert_eq!(order.total_amount.amount(), Decimal::new(expected_cents, 2));
            let subtotal_sum: Decimal = order.items.iter().map(|line| line.subtotal.amount()).sum();
            prop_assert_eq!(subtotal_sum, order.total_amount.amount());
            for (&(product_id, quantity), line) in items.iter().zip(&order.items) {
                prop_assert_eq!(line.product_id, product_id);
                prop_assert_eq!(line.quantity, quantity);
                prop_assert_eq!(market.stock_of(product_id).await, 100 - quantity);
            }
            Ok(())
        })?;
    }
}
