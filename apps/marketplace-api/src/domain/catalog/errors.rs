//! Catalog errors.

use std::fmt;

use crate::domain::shared::{ProductId, ShopId, UserId};

/// Errors raised while reading or editing shops and products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Shop does not exist.
    ShopNotFound {
        /// Requested shop.
        shop_id: Option<ShopId>,
    },

    /// The acting user must create a shop before managing products.
    ShopRequired {
        /// Acting user.
        user_id: UserId,
    },

    /// The acting user already owns a shop.
    ShopAlreadyExists {
        /// Acting user.
        user_id: UserId,
    },

    /// Product does not exist or was deleted.
    ProductNotFound {
        /// Requested product.
        product_id: ProductId,
    },

    /// A field failed validation.
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Error message.
        message: String,
    },

    /// A stock decrement would drive stock below zero.
    StockUnderflow {
        /// Units requested.
        requested: u32,
        /// Units on hand.
        available: u32,
    },
}

impl CatalogError {
    /// Shorthand for a field validation failure.
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShopNotFound {
                shop_id: Some(shop_id),
            } => write!(f, "Shop not found: {shop_id}"),
            Self::ShopNotFound { shop_id: None } => write!(f, "Shop not found"),
            Self::ShopRequired { .. } => write!(f, "Create a shop first"),
            Self::ShopAlreadyExists { user_id } => {
                write!(f, "User {user_id} already has a shop")
            }
            Self::ProductNotFound { product_id } => write!(f, "Product not found: {product_id}"),
            Self::InvalidField { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::StockUnderflow {
                requested,
                available,
            } => write!(
                f,
                "Stock underflow: requested {requested}, available {available}"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}
