//! Per-line eligibility checks run inside the placement unit of work.

use crate::domain::catalog::Product;
use crate::domain::ordering::errors::OrderError;
use crate::domain::shared::{Quantity, ShopId};

/// Check that `product` can fill `quantity` units of an order against `target_shop`.
///
/// Checks run in a fixed order: shop membership, then the active flag, then stock.
///
/// # Errors
///
/// Returns `ProductNotInShop`, `ProductInactive` or `InsufficientStock`.
pub fn validate_line(
    target_shop: ShopId,
    product: &Product,
    quantity: Quantity,
) -> Result<(), OrderError> {
    if product.shop_id() != target_shop {
        return Err(OrderError::ProductNotInShop {
            product_id: product.id(),
            shop_id: target_shop,
        });
    }

    if !product.is_active() {
        return Err(OrderError::ProductInactive {
            product_id: product.id(),
        });
    }

    if product.stock() < quantity.value() {
        return Err(OrderError::InsufficientStock {
            product_id: product.id(),
            requested: quantity.value(),
            available: product.stock(),
        });
    }

    Ok(())
}
