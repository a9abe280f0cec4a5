//! Data Transfer Objects
//!
//! Request and response shapes exchanged with driver adapters.

mod auth_dto;
mod catalog_dto;
mod order_dto;

pub use auth_dto::{AuthResponseDto, LoginDto, RegisterDto, UserDto, UserSummaryDto};
pub use catalog_dto::{
    CreateProductDto, CreateShopDto, ProductDto, ProductSummaryDto, ShopDetailsDto, ShopDto,
    ShopProductsDto, ShopSummaryDto, UpdateProductDto, UpdateShopDto,
};
pub use order_dto::{
    OrderDetailsDto, OrderItemDto, OrderLineDto, PlaceOrderRequestDto, UpdateOrderStatusDto,
};
