//! Order DTOs

use serde::{Deserialize, Serialize};

use super::{ProductSummaryDto, ShopSummaryDto, UserSummaryDto};
use crate::domain::ordering::{Order, OrderError, OrderLine, OrderStatus, PlaceOrderCommand};
use crate::domain::shared::{Money, OrderId, OrderLineId, ProductId, ShopId, Timestamp, UserId};

/// One requested cart item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDto {
    /// Requested product.
    pub product_id: ProductId,
    /// Requested units.
    pub quantity: u32,
}

/// Order placement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequestDto {
    /// Target shop.
    pub shop_id: ShopId,
    /// Cart items in the order they should be checked.
    pub items: Vec<OrderItemDto>,
    /// Optional note for the shop.
    #[serde(default)]
    pub note: Option<String>,
}

impl PlaceOrderRequestDto {
    /// Convert to a validated domain command.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` or `OrderError::InvalidQuantity`.
    pub fn into_command(self) -> Result<PlaceOrderCommand, OrderError> {
        PlaceOrderCommand::new(
            self.shop_id,
            self.items
                .into_iter()
                .map(|item| (item.product_id, item.quantity)),
            self.note,
        )
    }
}

/// Status update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusDto {
    /// Requested status, one of the six lifecycle values.
    pub status: String,
}

/// One line of an order response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineDto {
    /// Line id.
    pub id: OrderLineId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Ordered units.
    pub quantity: u32,
    /// Unit price frozen at placement.
    pub price: Money,
    /// `price * quantity`.
    pub subtotal: Money,
    /// Product detail, present unless the product row is gone entirely.
    pub product: Option<ProductSummaryDto>,
}

impl OrderLineDto {
    /// Build from a domain line.
    #[must_use]
    pub fn from_line(line: &OrderLine, product: Option<ProductSummaryDto>) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            quantity: line.quantity.value(),
            price: line.price,
            subtotal: line.subtotal(),
            product,
        }
    }
}

/// Order with its shop, customer and per-line product detail attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailsDto {
    /// Order id.
    pub id: OrderId,
    /// Placing customer.
    pub user_id: UserId,
    /// Target shop.
    pub shop_id: ShopId,
    /// Total amount.
    pub total_amount: Money,
    /// Current status.
    pub status: OrderStatus,
    /// Note for the shop.
    pub note: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
    /// Shop summary.
    pub shop: Option<ShopSummaryDto>,
    /// Customer summary.
    pub customer: Option<UserSummaryDto>,
    /// Lines in placement order.
    pub items: Vec<OrderLineDto>,
}

impl OrderDetailsDto {
    /// Assemble from a domain order and already-resolved line details.
    #[must_use]
    pub fn new(
        order: &Order,
        shop: Option<ShopSummaryDto>,
        customer: Option<UserSummaryDto>,
        items: Vec<OrderLineDto>,
    ) -> Self {
        Self {
            id: order.id(),
            user_id: order.user_id(),
            shop_id: order.shop_id(),
            total_amount: order.total_amount(),
            status: order.status(),
            note: order.note().to_string(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            shop,
            customer,
            items,
        }
    }
}
