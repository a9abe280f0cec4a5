//! Shop entity.

use crate::domain::shared::{ShopId, Timestamp, UserId};

use super::CatalogError;

/// A merchant storefront. Each user owns at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    /// Shop identifier.
    pub id: ShopId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Inactive shops are hidden from listings and cannot take orders.
    pub is_active: bool,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

impl Shop {
    /// Returns true if `user_id` owns this shop.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Apply an owner edit. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidField` if the new name is blank.
    pub fn apply_changes(&mut self, changes: ShopChanges, at: Timestamp) -> Result<(), CatalogError> {
        if let Some(name) = changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(CatalogError::invalid("name", "must not be empty"));
            }
            self.name = name.to_string();
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(address) = changes.address {
            self.address = address;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = at;
        Ok(())
    }
}

/// Insertion form of a [`Shop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShop {
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
}

impl NewShop {
    /// Validate and normalize a new shop.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidField` if the name is blank.
    pub fn new(
        owner_id: UserId,
        name: &str,
        description: String,
        address: String,
        phone: String,
    ) -> Result<Self, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::invalid("name", "must not be empty"));
        }
        Ok(Self {
            owner_id,
            name: name.to_string(),
            description,
            address,
            phone,
        })
    }

    /// Materialize the shop with a storage-assigned id. New shops start active.
    #[must_use]
    pub fn into_shop(self, id: ShopId, now: Timestamp) -> Shop {
        Shop {
            id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            address: self.address,
            phone: self.phone,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial owner edit of a shop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopChanges {
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
