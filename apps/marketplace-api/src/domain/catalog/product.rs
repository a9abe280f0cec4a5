//! Product entity.

use rust_decimal::Decimal;

use crate::domain::shared::{Money, ProductId, Quantity, ShopId, Timestamp};

use super::CatalogError;

/// Highest unit price the catalog accepts (one billion).
pub const MAX_PRICE: Money = Money::new(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

/// Persisted state of a product, used by storage adapters to rebuild the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// Product identifier.
    pub id: ProductId,
    /// Owning shop.
    pub shop_id: ShopId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Current unit price.
    pub price: Money,
    /// Units on hand.
    pub stock: u32,
    /// Whether the product can be ordered.
    pub is_active: bool,
    /// Optional image location.
    pub image_url: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
    /// Soft-deletion time.
    pub deleted_at: Option<Timestamp>,
}

/// A sellable item owned by one shop.
///
/// Stock is unsigned, so it can never be observed below zero; every
/// decrement goes through [`Product::decrement_stock`], which refuses to
/// underflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    shop_id: ShopId,
    name: String,
    description: String,
    price: Money,
    stock: u32,
    is_active: bool,
    image_url: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Product {
    /// Rebuild a product from storage.
    #[must_use]
    pub fn reconstitute(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            shop_id: record.shop_id,
            name: record.name,
            description: record.description,
            price: record.price,
            stock: record.stock,
            is_active: record.is_active,
            image_url: record.image_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
            deleted_at: record.deleted_at,
        }
    }

    /// Snapshot the entity for storage.
    #[must_use]
    pub fn to_record(&self) -> ProductRecord {
        ProductRecord {
            id: self.id,
            shop_id: self.shop_id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock: self.stock,
            is_active: self.is_active,
            image_url: self.image_url.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }

    /// Product identifier.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    /// Owning shop.
    #[must_use]
    pub const fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current unit price.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Units on hand.
    #[must_use]
    pub const fn stock(&self) -> u32 {
        self.stock
    }

    /// Whether the owner has the product switched on.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Optional image location.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Soft-deletion time, if deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    /// Returns true once the product has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Remove `quantity` units from stock.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::StockUnderflow` if fewer than `quantity` units
    /// are on hand; stock is left untouched.
    pub fn decrement_stock(&mut self, quantity: Quantity, at: Timestamp) -> Result<(), CatalogError> {
        let remaining =
            self.stock
                .checked_sub(quantity.value())
                .ok_or(CatalogError::StockUnderflow {
                    requested: quantity.value(),
                    available: self.stock,
                })?;
        self.stock = remaining;
        self.updated_at = at;
        Ok(())
    }

    /// Apply an owner edit. Absent fields are left unchanged.
    ///
    /// The edit is validated as a whole before any field is written.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidField` for a blank name, a price outside
    /// `(0, MAX_PRICE]`, or a negative stock count.
    pub fn apply_changes(
        &mut self,
        changes: ProductChanges,
        at: Timestamp,
    ) -> Result<(), CatalogError> {
        let name = changes.name.as_deref().map(validate_name).transpose()?;
        if let Some(price) = changes.price {
            validate_price(price)?;
        }
        let stock = changes.stock.map(validate_stock).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock) = stock {
            self.stock = stock;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(image_url) = changes.image_url {
            self.image_url = image_url;
        }
        self.updated_at = at;
        Ok(())
    }

    /// Logically remove the product. It stays in storage so past order
    /// lines can still be rendered.
    pub fn soft_delete(&mut self, at: Timestamp) {
        self.is_active = false;
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}

/// Insertion form of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// Owning shop.
    pub shop_id: ShopId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Initial unit price.
    pub price: Money,
    /// Initial units on hand.
    pub stock: u32,
    /// Optional image location.
    pub image_url: String,
}

impl NewProduct {
    /// Validate a new product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidField` for a blank name, a price outside
    /// `(0, MAX_PRICE]`, or a negative stock count.
    pub fn new(
        shop_id: ShopId,
        name: &str,
        description: String,
        price: Money,
        stock: i64,
        image_url: String,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            shop_id,
            name: validate_name(name)?,
            description,
            price: validate_price(price)?,
            stock: validate_stock(stock)?,
            image_url,
        })
    }

    /// Materialize the product with a storage-assigned id. New products start active.
    #[must_use]
    pub fn into_product(self, id: ProductId, now: Timestamp) -> Product {
        Product {
            id,
            shop_id: self.shop_id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            is_active: true,
            image_url: self.image_url,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Partial owner edit of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New unit price; existing order lines keep the price they were placed at.
    pub price: Option<Money>,
    /// New stock count.
    pub stock: Option<i64>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New image location.
    pub image_url: Option<String>,
}

fn validate_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::invalid("name", "must not be empty"));
    }
    Ok(name.to_string())
}

fn validate_price(price: Money) -> Result<Money, CatalogError> {
    if !price.is_positive() {
        return Err(CatalogError::invalid("price", "must be greater than zero"));
    }
    if price > MAX_PRICE {
        return Err(CatalogError::invalid(
            "price",
            format!("must not exceed {MAX_PRICE}"),
        ));
    }
    Ok(price)
}

fn validate_stock(stock: i64) -> Result<u32, CatalogError> {
    u32::try_from(stock).map_err(|_| {
        CatalogError::invalid("stock", format!("must be between 0 and {}", u32::MAX))
    })
}
