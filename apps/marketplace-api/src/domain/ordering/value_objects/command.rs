//! Order placement command.

use crate::domain::ordering::errors::OrderError;
use crate::domain::shared::{ProductId, Quantity, ShopId};

/// One requested (product, quantity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineRequest {
    /// Requested product.
    pub product_id: ProductId,
    /// Requested units.
    pub quantity: Quantity,
}

/// A validated cart ready to be placed against one shop.
///
/// Lines keep the caller's order; a product may appear more than once and
/// each occurrence is checked against stock already reduced by earlier lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrderCommand {
    shop_id: ShopId,
    lines: Vec<OrderLineRequest>,
    note: String,
}

impl PlaceOrderCommand {
    /// Build a command from raw `(product, quantity)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` for an empty cart and
    /// `OrderError::InvalidQuantity` for the first zero quantity.
    pub fn new(
        shop_id: ShopId,
        items: impl IntoIterator<Item = (ProductId, u32)>,
        note: Option<String>,
    ) -> Result<Self, OrderError> {
        let lines = items
            .into_iter()
            .map(|(product_id, quantity)| {
                Quantity::new(quantity)
                    .map(|quantity| OrderLineRequest {
                        product_id,
                        quantity,
                    })
                    .map_err(|_| OrderError::InvalidQuantity { product_id })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        Ok(Self {
            shop_id,
            lines,
            note: note.map(|n| n.trim().to_string()).unwrap_or_default(),
        })
    }

    /// Target shop.
    #[must_use]
    pub const fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    /// Requested lines in caller order.
    #[must_use]
    pub fn lines(&self) -> &[OrderLineRequest] {
        &self.lines
    }

    /// Free-text note, empty when absent.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }
}
