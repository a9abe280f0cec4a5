//! HTTP response bodies.
//!
//! Single resources are returned as their DTO. Collections are wrapped in a
//! named envelope so the payload can grow fields later.

use serde::{Deserialize, Serialize};

use crate::application::dto::{OrderDetailsDto, ProductDto, ShopDto};

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process can answer.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Active shops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopsResponse {
    /// Shops.
    pub shops: Vec<ShopDto>,
}

/// Active products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsResponse {
    /// Products.
    pub products: Vec<ProductDto>,
}

/// Orders visible to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    /// Orders, newest first.
    pub orders: Vec<OrderDetailsDto>,
}

/// Acknowledgement with no resource body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// What happened.
    pub message: String,
}
