//! Order Query Use Case
//!
//! Read side of ordering. Visibility is decided by the principal's role:
//! customers see their own orders, shop owners see orders against their
//! shop, admins see everything.

use std::sync::Arc;

use crate::application::dto::OrderDetailsDto;
use crate::application::errors::ServiceError;
use crate::application::ports::MarketplaceStore;
use crate::domain::catalog::{CatalogError, Shop};
use crate::domain::identity::{AccessError, OrderScope, Principal, Role, can_view};
use crate::domain::ordering::OrderError;
use crate::domain::shared::OrderId;

use super::OrderDetailsAssembler;

/// Use case for listing and fetching orders.
pub struct OrderQueryUseCase<S: MarketplaceStore> {
    store: Arc<S>,
    details: OrderDetailsAssembler<S>,
}

impl<S: MarketplaceStore> OrderQueryUseCase<S> {
    /// Create a new OrderQueryUseCase.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            details: OrderDetailsAssembler::new(Arc::clone(&store)),
            store,
        }
    }

    /// List every order visible to `principal`, newest first.
    ///
    /// # Errors
    ///
    /// A shop user without a shop gets `CatalogError::ShopNotFound`.
    #[tracing::instrument(name = "order.list", skip_all, fields(user_id = %principal.user_id))]
    pub async fn list_orders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<OrderDetailsDto>, ServiceError> {
        let scope = match principal.role {
            Role::Customer => OrderScope::Customer(principal.user_id),
            Role::Admin => OrderScope::All,
            Role::Shop => {
                let shop = self
                    .owned_shop(principal)
                    .await?
                    .ok_or(CatalogError::ShopNotFound { shop_id: None })?;
                OrderScope::Shop(shop.id)
            }
        };

        let orders = self.store.list_orders(scope).await?;
        tracing::debug!(count = orders.len(), "Orders listed");

        let mut out = Vec::with_capacity(orders.len());
        for order in &orders {
            out.push(self.details.assemble(order).await?);
        }
        Ok(out)
    }

    /// Fetch one order if `principal` may see it.
    #[tracing::instrument(
        name = "order.get",
        skip_all,
        fields(user_id = %principal.user_id, order_id = %order_id)
    )]
    pub async fn get_order(
        &self,
        principal: &Principal,
        order_id: OrderId,
    ) -> Result<OrderDetailsDto, ServiceError> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound { order_id })?;

        let owned_shop = self.owned_shop(principal).await?;
        if !can_view(principal, &order, owned_shop.as_ref()) {
            return Err(AccessError::Forbidden {
                reason: format!("order {order_id} is not visible to this account"),
            }
            .into());
        }

        Ok(self.details.assemble(&order).await?)
    }

    async fn owned_shop(&self, principal: &Principal) -> Result<Option<Shop>, ServiceError> {
        if principal.role != Role::Shop {
            return Ok(None);
        }
        Ok(self.store.find_shop_by_owner(principal.user_id).await?)
    }
}
