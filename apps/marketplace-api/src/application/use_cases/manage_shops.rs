//! Shop Use Cases

use std::sync::Arc;

use crate::application::dto::{
    CreateShopDto, ProductDto, ShopDetailsDto, ShopDto, ShopProductsDto, UpdateShopDto,
};
use crate::application::errors::ServiceError;
use crate::application::ports::{MarketplaceStore, StoreError};
use crate::domain::catalog::{CatalogError, NewShop, Shop};
use crate::domain::identity::{Capability, Principal, require, require_shop_owner};
use crate::domain::shared::{ShopId, Timestamp};

/// Browsing and owner management of shops.
pub struct ShopUseCase<S: MarketplaceStore> {
    store: Arc<S>,
}

impl<S: MarketplaceStore> ShopUseCase<S> {
    /// Create a new ShopUseCase.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List active shops.
    pub async fn list_active_shops(&self) -> Result<Vec<ShopDto>, ServiceError> {
        let shops = self.store.list_active_shops().await?;
        Ok(shops.iter().map(ShopDto::from).collect())
    }

    /// Get a shop with its active products.
    pub async fn get_shop(&self, shop_id: ShopId) -> Result<ShopDetailsDto, ServiceError> {
        let shop = self.load(shop_id).await?;
        let products = self.active_products(shop_id).await?;
        Ok(ShopDetailsDto {
            shop: ShopDto::from(&shop),
            products,
        })
    }

    /// List the active products of an existing shop.
    pub async fn list_shop_products(
        &self,
        shop_id: ShopId,
    ) -> Result<ShopProductsDto, ServiceError> {
        let shop = self.load(shop_id).await?;
        let products = self.active_products(shop_id).await?;
        Ok(ShopProductsDto {
            shop_id,
            shop_name: shop.name,
            products,
        })
    }

    /// Open a shop for the acting user. A user owns at most one shop.
    #[tracing::instrument(name = "shop.create", skip_all, fields(user_id = %principal.user_id))]
    pub async fn create_shop(
        &self,
        principal: &Principal,
        request: CreateShopDto,
    ) -> Result<ShopDto, ServiceError> {
        require(principal, Capability::ManageShop)?;

        let user_id = principal.user_id;
        if self.store.find_shop_by_owner(user_id).await?.is_some() {
            return Err(CatalogError::ShopAlreadyExists { user_id }.into());
        }

        let new_shop = NewShop::new(
            user_id,
            &request.name,
            request.description,
            request.address,
            request.phone,
        )?;
        let shop = self
            .store
            .insert_shop(new_shop)
            .await
            .map_err(|err| match err {
                // Lost a race with a concurrent create for the same owner.
                StoreError::Duplicate(_) => CatalogError::ShopAlreadyExists { user_id }.into(),
                other => ServiceError::from(other),
            })?;

        tracing::info!(shop_id = %shop.id, "Shop created");
        Ok(ShopDto::from(&shop))
    }

    /// Apply an owner edit to a shop.
    #[tracing::instrument(
        name = "shop.update",
        skip_all,
        fields(user_id = %principal.user_id, shop_id = %shop_id)
    )]
    pub async fn update_shop(
        &self,
        principal: &Principal,
        shop_id: ShopId,
        request: UpdateShopDto,
    ) -> Result<ShopDto, ServiceError> {
        require(principal, Capability::ManageShop)?;

        let mut shop = self.load(shop_id).await?;
        require_shop_owner(principal, &shop)?;

        shop.apply_changes(request.into(), Timestamp::now())?;
        self.store.update_shop(&shop).await?;

        tracing::info!("Shop updated");
        Ok(ShopDto::from(&shop))
    }

    async fn load(&self, shop_id: ShopId) -> Result<Shop, ServiceError> {
        Ok(self
            .store
            .get_shop(shop_id)
            .await?
            .ok_or(CatalogError::ShopNotFound {
                shop_id: Some(shop_id),
            })?)
    }

    async fn active_products(&self, shop_id: ShopId) -> Result<Vec<ProductDto>, ServiceError> {
        let products = self.store.list_active_products(Some(shop_id)).await?;
        Ok(products.iter().map(ProductDto::from).collect())
    }
}
