//! Product Use Cases
//!
//! Owner edits go through a unit of work, the same as placements, so an
//! edit never overwrites a stock decrement committed in between.

use std::sync::Arc;

use crate::application::dto::{CreateProductDto, ProductDto, UpdateProductDto};
use crate::application::errors::ServiceError;
use crate::application::ports::{MarketplaceStore, TransactionalStore, UnitOfWork};
use crate::domain::catalog::{CatalogError, NewProduct, Product, ProductChanges, Shop};
use crate::domain::identity::{AccessError, Capability, Principal, require};
use crate::domain::shared::{ProductId, Timestamp};

const EDIT_ATTEMPTS: u32 = 3;

/// Browsing and owner management of products.
pub struct ProductUseCase<S: MarketplaceStore> {
    store: Arc<S>,
}

impl<S: MarketplaceStore> ProductUseCase<S> {
    /// Create a new ProductUseCase.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List active, non-deleted products across all shops.
    pub async fn list_active_products(&self) -> Result<Vec<ProductDto>, ServiceError> {
        let products = self.store.list_active_products(None).await?;
        Ok(products.iter().map(ProductDto::from).collect())
    }

    /// Get a product. Soft-deleted products are not found.
    pub async fn get_product(&self, product_id: ProductId) -> Result<ProductDto, ServiceError> {
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound { product_id })?;
        Ok(ProductDto::from(&product))
    }

    /// Add a product to the acting user's shop.
    #[tracing::instrument(name = "product.create", skip_all, fields(user_id = %principal.user_id))]
    pub async fn create_product(
        &self,
        principal: &Principal,
        request: CreateProductDto,
    ) -> Result<ProductDto, ServiceError> {
        let shop = self.owned_shop(principal).await?;

        let new_product = NewProduct::new(
            shop.id,
            &request.name,
            request.description,
            request.price,
            request.stock,
            request.image_url,
        )?;
        let product = self.store.insert_product(new_product).await?;

        tracing::info!(product_id = %product.id(), shop_id = %shop.id, "Product created");
        Ok(ProductDto::from(&product))
    }

    /// Apply an owner edit. Absent fields are left unchanged.
    #[tracing::instrument(
        name = "product.update",
        skip_all,
        fields(user_id = %principal.user_id, product_id = %product_id)
    )]
    pub async fn update_product(
        &self,
        principal: &Principal,
        product_id: ProductId,
        request: UpdateProductDto,
    ) -> Result<ProductDto, ServiceError> {
        let changes = ProductChanges::from(request);
        let product = self
            .edit(principal, product_id, |product, at| {
                product.apply_changes(changes.clone(), at)
            })
            .await?;

        tracing::info!("Product updated");
        Ok(ProductDto::from(&product))
    }

    /// Soft-delete a product. Past orders keep rendering it.
    #[tracing::instrument(
        name = "product.delete",
        skip_all,
        fields(user_id = %principal.user_id, product_id = %product_id)
    )]
    pub async fn delete_product(
        &self,
        principal: &Principal,
        product_id: ProductId,
    ) -> Result<(), ServiceError> {
        self.edit(principal, product_id, |product, at| {
            product.soft_delete(at);
            Ok(())
        })
        .await?;

        tracing::info!("Product deleted");
        Ok(())
    }

    /// The acting user's shop, or `ShopRequired`.
    async fn owned_shop(&self, principal: &Principal) -> Result<Shop, ServiceError> {
        require(principal, Capability::ManageCatalog)?;
        let user_id = principal.user_id;
        Ok(self
            .store
            .find_shop_by_owner(user_id)
            .await?
            .ok_or(CatalogError::ShopRequired { user_id })?)
    }

    /// Load, modify and save a product inside a unit of work, re-running
    /// on a retryable storage failure.
    async fn edit<F>(
        &self,
        principal: &Principal,
        product_id: ProductId,
        apply: F,
    ) -> Result<Product, ServiceError>
    where
        F: Fn(&mut Product, Timestamp) -> Result<(), CatalogError> + Send + Sync,
    {
        // Resolved before the unit begins; the unit may hold the store lock.
        let shop = self.owned_shop(principal).await?;

        let mut attempt = 1;
        loop {
            match self.edit_once(&shop, product_id, &apply).await {
                Err(ServiceError::Persistence(err))
                    if err.is_retryable() && attempt < EDIT_ATTEMPTS =>
                {
                    tracing::warn!(attempt, error = %err, "Product edit conflicted, retrying");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn edit_once<F>(
        &self,
        shop: &Shop,
        product_id: ProductId,
        apply: &F,
    ) -> Result<Product, ServiceError>
    where
        F: Fn(&mut Product, Timestamp) -> Result<(), CatalogError> + Send + Sync,
    {
        let mut unit = self.store.begin().await?;

        let staged = Self::stage(&mut unit, shop, product_id, apply).await;
        match staged {
            Ok(product) => {
                unit.commit().await?;
                Ok(product)
            }
            Err(err) => {
                if let Err(rollback_err) = unit.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn stage<F>(
        unit: &mut <S as TransactionalStore>::Unit,
        shop: &Shop,
        product_id: ProductId,
        apply: &F,
    ) -> Result<Product, ServiceError>
    where
        F: Fn(&mut Product, Timestamp) -> Result<(), CatalogError> + Send + Sync,
    {
        let mut product = unit
            .get_product(product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound { product_id })?;

        if product.shop_id() != shop.id {
            return Err(AccessError::Forbidden {
                reason: format!("product {product_id} belongs to another shop"),
            }
            .into());
        }

        apply(&mut product, Timestamp::now())?;
        unit.save_product(&product).await?;
        Ok(product)
    }
}
