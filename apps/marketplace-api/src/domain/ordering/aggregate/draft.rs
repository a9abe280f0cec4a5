//! Order draft: the write set accumulated during a placement.

use super::{Order, OrderLine};
use crate::domain::catalog::Product;
use crate::domain::ordering::errors::OrderError;
use crate::domain::ordering::value_objects::OrderStatus;
use crate::domain::shared::{
    Money, OrderId, OrderLineId, ProductId, Quantity, ShopId, Timestamp, UserId,
};

/// A line recorded in a draft, with its price frozen at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftLine {
    /// Ordered product.
    pub product_id: ProductId,
    /// Ordered units.
    pub quantity: Quantity,
    /// Unit price captured from the product.
    pub price: Money,
}

/// An order that has passed validation but has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    user_id: UserId,
    shop_id: ShopId,
    note: String,
    lines: Vec<DraftLine>,
    total: Money,
}

impl OrderDraft {
    /// Start an empty draft.
    #[must_use]
    pub fn new(user_id: UserId, shop_id: ShopId, note: impl Into<String>) -> Self {
        Self {
            user_id,
            shop_id,
            note: note.into(),
            lines: Vec::new(),
            total: Money::ZERO,
        }
    }

    /// Record a line at the product's current price and add it to the total.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AmountOverflow` if the subtotal or the new total
    /// does not fit; the draft is left unchanged.
    pub fn add_line(&mut self, product: &Product, quantity: Quantity) -> Result<(), OrderError> {
        let line = DraftLine {
            product_id: product.id(),
            quantity,
            price: product.price(),
        };
        let overflow = OrderError::AmountOverflow {
            product_id: line.product_id,
        };
        let subtotal = line.price.checked_times(quantity).ok_or_else(|| overflow.clone())?;
        self.total = self.total.checked_add(subtotal).ok_or(overflow)?;
        self.lines.push(line);
        Ok(())
    }

    /// Placing user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Target shop.
    #[must_use]
    pub const fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    /// Free-text note.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Recorded lines in placement order.
    #[must_use]
    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Running total of all recorded lines.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    /// Materialize the order once storage has assigned ids. Line ids are
    /// taken in sequence starting at `first_line_id`.
    #[must_use]
    pub fn into_order(self, id: OrderId, first_line_id: i64, now: Timestamp) -> Order {
        let lines = self
            .lines
            .iter()
            .zip(first_line_id..)
            .map(|(line, line_id)| OrderLine {
                id: OrderLineId::new(line_id),
                order_id: id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
            })
            .collect();

        Order::reconstitute(super::OrderRecord {
            id,
            user_id: self.user_id,
            shop_id: self.shop_id,
            total_amount: self.total,
            status: OrderStatus::Pending,
            note: self.note,
            lines,
            created_at: now,
            updated_at: now,
        })
    }
}
