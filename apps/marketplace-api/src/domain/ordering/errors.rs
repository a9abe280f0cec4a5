//! Ordering errors.

use std::fmt;

use super::value_objects::OrderStatus;
use crate::domain::shared::{OrderId, ProductId, ShopId};

/// Errors raised while placing an order or changing its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The cart has no items.
    EmptyOrder,

    /// A line asked for zero units.
    InvalidQuantity {
        /// Offending product.
        product_id: ProductId,
    },

    /// Target shop does not exist.
    ShopNotFound {
        /// Requested shop.
        shop_id: ShopId,
    },

    /// Target shop exists but is not accepting orders.
    ShopInactive {
        /// Requested shop.
        shop_id: ShopId,
    },

    /// A requested product does not exist.
    ProductNotFound {
        /// Missing product.
        product_id: ProductId,
    },

    /// A requested product belongs to a different shop than the order.
    ProductNotInShop {
        /// Offending product.
        product_id: ProductId,
        /// Shop the order targets.
        shop_id: ShopId,
    },

    /// A requested product is switched off.
    ProductInactive {
        /// Offending product.
        product_id: ProductId,
    },

    /// Not enough units on hand to fill a line.
    InsufficientStock {
        /// Offending product.
        product_id: ProductId,
        /// Units requested by the line.
        requested: u32,
        /// Units on hand when the line was checked.
        available: u32,
    },

    /// A line subtotal or the order total does not fit a monetary amount.
    AmountOverflow {
        /// Product whose line overflowed.
        product_id: ProductId,
    },

    /// Order does not exist.
    OrderNotFound {
        /// Requested order.
        order_id: OrderId,
    },

    /// Status text is not one of the recognized lifecycle values.
    InvalidStatus {
        /// Text supplied by the caller.
        value: String,
    },

    /// The configured transition policy refuses this status change.
    InvalidTransition {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyOrder => write!(f, "Order must contain at least one item"),
            Self::InvalidQuantity { product_id } => {
                write!(f, "Quantity for product {product_id} must be greater than zero")
            }
            Self::ShopNotFound { shop_id } => write!(f, "Shop not found: {shop_id}"),
            Self::ShopInactive { shop_id } => write!(f, "Shop {shop_id} is not active"),
            Self::ProductNotFound { product_id } => {
                write!(f, "Product not found: {product_id}")
            }
            Self::ProductNotInShop {
                product_id,
                shop_id,
            } => write!(f, "Product {product_id} does not belong to shop {shop_id}"),
            Self::ProductInactive { product_id } => {
                write!(f, "Product {product_id} is not available")
            }
            Self::InsufficientStock {
                product_id,
                requested,
                available,
            } => write!(
                f,
                "Insufficient stock for product {product_id}: requested {requested}, available {available}"
            ),
            Self::AmountOverflow { product_id } => {
                write!(f, "Order amount is too large at product {product_id}")
            }
            Self::OrderNotFound { order_id } => write!(f, "Order not found: {order_id}"),
            Self::InvalidStatus { value } => write!(f, "Invalid order status: '{value}'"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Order cannot move from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for OrderError {}
