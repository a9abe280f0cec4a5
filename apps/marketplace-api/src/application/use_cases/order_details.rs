//! Order detail assembly shared by the placement, status and query use cases.

use std::sync::Arc;

use crate::application::dto::{
    OrderDetailsDto, OrderLineDto, ProductSummaryDto, ShopSummaryDto, UserSummaryDto,
};
use crate::application::ports::{MarketplaceStore, StoreError};
use crate::domain::ordering::Order;

/// Attaches shop, customer and per-line product detail to an order.
///
/// Products are looked up including soft-deleted rows so historical orders
/// stay renderable.
pub struct OrderDetailsAssembler<S: MarketplaceStore> {
    store: Arc<S>,
}

impl<S: MarketplaceStore> OrderDetailsAssembler<S> {
    /// Create a new assembler.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Assemble an already-loaded order.
    pub async fn assemble(&self, order: &Order) -> Result<OrderDetailsDto, StoreError> {
        let shop = self
            .store
            .get_shop(order.shop_id())
            .await?
            .as_ref()
            .map(ShopSummaryDto::from);
        let customer = self
            .store
            .find_user(order.user_id())
            .await?
            .as_ref()
            .map(UserSummaryDto::from);

        let mut items = Vec::with_capacity(order.lines().len());
        for line in order.lines() {
            let product = self
                .store
                .get_product_including_deleted(line.product_id)
                .await?;
            items.push(OrderLineDto::from_line(
                line,
                product.as_ref().map(ProductSummaryDto::from),
            ));
        }

        Ok(OrderDetailsDto::new(order, shop, customer, items))
    }
}
