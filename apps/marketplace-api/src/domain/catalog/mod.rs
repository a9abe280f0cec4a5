//! Catalog Bounded Context
//!
//! Shops and the products they sell. Product stock is the one contended
//! resource in the system; it only moves through [`Product::decrement_stock`]
//! during order placement and through owner edits.

pub mod errors;
pub mod product;
pub mod shop;

pub use errors::CatalogError;
pub use product::{MAX_PRICE, NewProduct, Product, ProductChanges, ProductRecord};
pub use shop::{NewShop, Shop, ShopChanges};
