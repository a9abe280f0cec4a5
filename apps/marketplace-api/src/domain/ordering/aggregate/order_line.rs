//! Order line entity.

use crate::domain::shared::{Money, OrderId, OrderLineId, ProductId, Quantity};

/// One product/quantity/price entry of a placed order.
///
/// `price` is the unit price captured when the order was placed and never
/// follows later product edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    /// Line identifier.
    pub id: OrderLineId,
    /// Parent order.
    pub order_id: OrderId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Ordered units.
    pub quantity: Quantity,
    /// Frozen unit price.
    pub price: Money,
}

impl OrderLine {
    /// `price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.price.times(self.quantity)
    }
}
