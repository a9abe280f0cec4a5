//! Update Order Status Use Case
//!
//! Moves an order through its lifecycle on behalf of the owning shop.

use std::sync::Arc;

use crate::application::dto::{OrderDetailsDto, UpdateOrderStatusDto};
use crate::application::errors::ServiceError;
use crate::application::ports::MarketplaceStore;
use crate::domain::catalog::CatalogError;
use crate::domain::identity::{Capability, Principal, require, require_shop_owner};
use crate::domain::ordering::{OrderError, OrderStateMachine, OrderStatus, TransitionPolicy};
use crate::domain::shared::{OrderId, Timestamp};
use crate::observability::record_status_transition;

use super::OrderDetailsAssembler;

/// Use case for changing an order's status.
pub struct UpdateOrderStatusUseCase<S: MarketplaceStore> {
    store: Arc<S>,
    details: OrderDetailsAssembler<S>,
    policy: TransitionPolicy,
}

impl<S: MarketplaceStore> UpdateOrderStatusUseCase<S> {
    /// Create a new UpdateOrderStatusUseCase.
    pub fn new(store: Arc<S>, policy: TransitionPolicy) -> Self {
        Self {
            details: OrderDetailsAssembler::new(Arc::clone(&store)),
            store,
            policy,
        }
    }

    /// Execute the use case.
    ///
    /// Only the status and `updated_at` change; stock and totals are never
    /// touched.
    #[tracing::instrument(
        name = "order.update_status",
        skip_all,
        fields(user_id = %principal.user_id, order_id = %order_id, status = %request.status)
    )]
    pub async fn execute(
        &self,
        principal: &Principal,
        order_id: OrderId,
        request: UpdateOrderStatusDto,
    ) -> Result<OrderDetailsDto, ServiceError> {
        require(principal, Capability::ManageOrderStatus)?;

        let mut order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound { order_id })?;

        let shop = self
            .store
            .get_shop(order.shop_id())
            .await?
            .ok_or(CatalogError::ShopNotFound {
                shop_id: Some(order.shop_id()),
            })?;
        require_shop_owner(principal, &shop)?;

        let requested: OrderStatus = request.status.parse()?;
        let current = order.status();
        OrderStateMachine::validate_transition(current, requested, self.policy)?;

        if current.is_terminal() && current != requested {
            tracing::warn!(
                from = %current,
                to = %requested,
                "Order leaves a terminal status"
            );
        }

        order.change_status(requested, Timestamp::now());
        self.store.update_order_status(&order).await?;

        record_status_transition(current.as_str(), requested.as_str());
        tracing::info!(from = %current, to = %requested, "Order status updated");

        Ok(self.details.assemble(&order).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{OrderItemDto, PlaceOrderRequestDto};
    use crate::application::ports::OrderRepository;
    use crate::application::use_cases::PlaceOrderUseCase;
    use crate::application::use_cases::fixtures::Fixture;
    use crate::domain::identity::Role;
    use crate::domain::shared::Money;
    use crate::infrastructure::persistence::InMemoryStore;
    use rust_decimal_macros::dec;

    struct Placed {
        fx: Fixture,
        owner: Principal,
        customer: Principal,
        order_id: OrderId,
        product_id: crate::domain::shared::ProductId,
    }

    async fn placed_order() -> Placed {
        let fx = Fixture::new();
        let owner = fx.user("owner", Role::Shop).await;
        let customer = fx.user("alice", Role::Customer).await;
        let shop = fx.shop(&owner).await;
        let product = fx.product(&shop, Money::new(dec!(4.00)), 10).await;

        let order = PlaceOrderUseCase::new(Arc::clone(&fx.store))
            .execute(
                &customer,
                PlaceOrderRequestDto {
                    shop_id: shop.id,
                    items: vec![OrderItemDto {
                        product_id: product.id(),
                        quantity: 2,
                    }],
                    note: None,
                },
            )
            .await
            .unwrap();

        Placed {
            fx,
            owner,
            customer,
            order_id: order.id,
            product_id: product.id(),
        }
    }

    fn use_case(
        fx: &Fixture,
        policy: TransitionPolicy,
    ) -> UpdateOrderStatusUseCase<InMemoryStore> {
        UpdateOrderStatusUseCase::new(Arc::clone(&fx.store), policy)
    }

    fn status(value: &str) -> UpdateOrderStatusDto {
        UpdateOrderStatusDto {
            status: value.to_string(),
        }
    }

    #[tokio::test]
    async fn owner_moves_order_forward() {
        let p = placed_order().await;

        let order = use_case(&p.fx, TransitionPolicy::Permissive)
            .execute(&p.owner, p.order_id, status("confirmed"))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.total_amount, Money::new(dec!(8.00)));
        assert_eq!(p.fx.stock_of(p.product_id).await, 8);
    }

    #[tokio::test]
    async fn other_shop_owner_is_forbidden() {
        let p = placed_order().await;
        let intruder = p.fx.user("intruder", Role::Shop).await;
        p.fx.shop(&intruder).await;

        let err = use_case(&p.fx, TransitionPolicy::Permissive)
            .execute(&intruder, p.order_id, status("cancelled"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Access(_)));
        let order = p.fx.store.find_order(p.order_id).await.unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn customer_cannot_change_status() {
        let p = placed_order().await;

        let err = use_case(&p.fx, TransitionPolicy::Permissive)
            .execute(&p.customer, p.order_id, status("cancelled"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Access(_)));
    }

    #[tokio::test]
    async fn unknown_status_is_rejected() {
        let p = placed_order().await;

        let err = use_case(&p.fx, TransitionPolicy::Permissive)
            .execute(&p.owner, p.order_id, status("shipped"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Order(OrderError::InvalidStatus {
                value: "shipped".to_string()
            })
        );
    }

    #[tokio::test]
    async fn padded_status_is_rejected_verbatim() {
        let p = placed_order().await;

        let err = use_case(&p.fx, TransitionPolicy::Permissive)
            .execute(&p.owner, p.order_id, status(" confirmed "))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Order(OrderError::InvalidStatus {
                value: " confirmed ".to_string()
            })
        );
        let stored = p.fx.store.find_order(p.order_id).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn missing_order_is_reported() {
        let p = placed_order().await;

        let err = use_case(&p.fx, TransitionPolicy::Permissive)
            .execute(&p.owner, OrderId::new(404), status("confirmed"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Order(OrderError::OrderNotFound {
                order_id: OrderId::new(404)
            })
        );
    }

    #[tokio::test]
    async fn permissive_policy_allows_leaving_terminal_state() {
        let p = placed_order().await;
        let uc = use_case(&p.fx, TransitionPolicy::Permissive);

        uc.execute(&p.owner, p.order_id, status("delivered"))
            .await
            .unwrap();
        let order = uc
            .execute(&p.owner, p.order_id, status("pending"))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn strict_policy_rejects_skipping_steps() {
        let p = placed_order().await;
        let uc = use_case(&p.fx, TransitionPolicy::Strict);

        let err = uc
            .execute(&p.owner, p.order_id, status("delivered"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Order(OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered
            })
        );

        let order = uc
            .execute(&p.owner, p.order_id, status("confirmed"))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
    }
}
