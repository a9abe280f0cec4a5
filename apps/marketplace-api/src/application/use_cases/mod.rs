//! Use Cases (Application Services)
//!
//! Each use case owns one user-facing operation. They share the store handle
//! they were built with; none keeps mutable state between calls.

mod accounts;
mod manage_products;
mod manage_shops;
mod order_details;
mod place_order;
mod query_orders;
mod update_order_status;

#[cfg(test)]
mod fixtures;

pub use accounts::{AccountPolicy, AccountUseCase};
pub use manage_products::ProductUseCase;
pub use manage_shops::ShopUseCase;
pub use order_details::OrderDetailsAssembler;
pub use place_order::PlaceOrderUseCase;
pub use query_orders::OrderQueryUseCase;
pub use update_order_status::UpdateOrderStatusUseCase;
