//! Shop and product DTOs

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Product, ProductChanges, Shop, ShopChanges};
use crate::domain::shared::{Money, ProductId, ShopId, Timestamp, UserId};

/// Full shop representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopDto {
    /// Shop id.
    pub id: ShopId,
    /// Owning user.
    pub owner_id: UserId,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Address.
    pub address: String,
    /// Phone.
    pub phone: String,
    /// Active flag.
    pub is_active: bool,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

impl From<&Shop> for ShopDto {
    fn from(shop: &Shop) -> Self {
        Self {
            id: shop.id,
            owner_id: shop.owner_id,
            name: shop.name.clone(),
            description: shop.description.clone(),
            address: shop.address.clone(),
            phone: shop.phone.clone(),
            is_active: shop.is_active,
            created_at: shop.created_at,
            updated_at: shop.updated_at,
        }
    }
}

/// Shop summary embedded in order responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSummaryDto {
    /// Shop id.
    pub id: ShopId,
    /// Name.
    pub name: String,
    /// Address.
    pub address: String,
    /// Phone.
    pub phone: String,
}

impl From<&Shop> for ShopSummaryDto {
    fn from(shop: &Shop) -> Self {
        Self {
            id: shop.id,
            name: shop.name.clone(),
            address: shop.address.clone(),
            phone: shop.phone.clone(),
        }
    }
}

/// Shop with its active products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopDetailsDto {
    /// The shop.
    #[serde(flatten)]
    pub shop: ShopDto,
    /// Active products.
    pub products: Vec<ProductDto>,
}

/// Active products of one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopProductsDto {
    /// Shop id.
    pub shop_id: ShopId,
    /// Shop name.
    pub shop_name: String,
    /// Active products.
    pub products: Vec<ProductDto>,
}

/// Full product representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    /// Product id.
    pub id: ProductId,
    /// Owning shop.
    pub shop_id: ShopId,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Current unit price.
    pub price: Money,
    /// Units on hand.
    pub stock: u32,
    /// Active flag.
    pub is_active: bool,
    /// Image location.
    pub image_url: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            shop_id: product.shop_id(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price: product.price(),
            stock: product.stock(),
            is_active: product.is_active(),
            image_url: product.image_url().to_string(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}

/// Product summary embedded in order lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummaryDto {
    /// Product id.
    pub id: ProductId,
    /// Name.
    pub name: String,
    /// Image location.
    pub image_url: String,
    /// Current price, which may differ from the line's frozen price.
    pub current_price: Money,
    /// True once the product has been removed from the catalog.
    pub deleted: bool,
}

impl From<&Product> for ProductSummaryDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            image_url: product.image_url().to_string(),
            current_price: product.price(),
            deleted: product.is_deleted(),
        }
    }
}

/// Shop creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShopDto {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Address.
    #[serde(default)]
    pub address: String,
    /// Phone.
    #[serde(default)]
    pub phone: String,
}

/// Partial shop update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShopDto {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl From<UpdateShopDto> for ShopChanges {
    fn from(dto: UpdateShopDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            address: dto.address,
            phone: dto.phone,
            is_active: dto.is_active,
        }
    }
}

/// Product creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductDto {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Unit price; must be positive.
    pub price: Money,
    /// Initial stock; must not be negative.
    #[serde(default)]
    pub stock: i64,
    /// Image location.
    #[serde(default)]
    pub image_url: String,
}

/// Partial product update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductDto {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New unit price.
    pub price: Option<Money>,
    /// New stock count.
    pub stock: Option<i64>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New image location.
    pub image_url: Option<String>,
}

impl From<UpdateProductDto> for ProductChanges {
    fn from(dto: UpdateProductDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            price: dto.price,
            stock: dto.stock,
            is_active: dto.is_active,
            image_url: dto.image_url,
        }
    }
}
