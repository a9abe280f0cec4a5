//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases. Handlers
//! only extract, call one use case, and pick a status code. Order writes
//! check the caller's capability before reading the body.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::dto::{
    CreateProductDto, CreateShopDto, LoginDto, PlaceOrderRequestDto, RegisterDto,
    UpdateOrderStatusDto, UpdateProductDto, UpdateShopDto,
};
use crate::application::errors::ServiceError;
use crate::application::ports::{IdentityPort, MarketplaceStore};
use crate::application::use_cases::{
    AccountUseCase, OrderQueryUseCase, PlaceOrderUseCase, ProductUseCase, ShopUseCase,
    UpdateOrderStatusUseCase,
};
use crate::domain::identity::{Capability, require};
use crate::domain::shared::{OrderId, ProductId, ShopId};
use crate::error::ApiError;

use super::extractors::{ApiJson, ApiPath, Authenticated};
use super::response::{
    HealthResponse, MessageResponse, OrdersResponse, ProductsResponse, ShopsResponse,
};

/// Application state shared across handlers.
pub struct AppState<S, I>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    /// Registration, login and sessions.
    pub accounts: Arc<AccountUseCase<S, I>>,
    /// Shop browsing and management.
    pub shops: Arc<ShopUseCase<S>>,
    /// Product browsing and management.
    pub products: Arc<ProductUseCase<S>>,
    /// Atomic order placement.
    pub place_order: Arc<PlaceOrderUseCase<S>>,
    /// Order reads.
    pub order_queries: Arc<OrderQueryUseCase<S>>,
    /// Order status changes.
    pub update_order_status: Arc<UpdateOrderStatusUseCase<S>>,
    /// Resolves bearer tokens.
    pub identity: Arc<I>,
    /// Application version.
    pub version: String,
}

impl<S, I> Clone for AppState<S, I>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            shops: Arc::clone(&self.shops),
            products: Arc::clone(&self.products),
            place_order: Arc::clone(&self.place_order),
            order_queries: Arc::clone(&self.order_queries),
            update_order_status: Arc::clone(&self.update_order_status),
            identity: Arc::clone(&self.identity),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<S, I>(state: AppState<S, I>) -> Router
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .route("/shops", get(list_shops).post(create_shop))
        .route("/shops/{id}", get(get_shop).put(update_shop))
        .route("/shops/{id}/products", get(list_shop_products))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %Uuid::new_v4(),
            )
        }))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint.
async fn health_check<S, I>(State(state): State<AppState<S, I>>) -> impl IntoResponse
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

// Accounts

async fn register<S, I>(
    State(state): State<AppState<S, I>>,
    ApiJson(request): ApiJson<RegisterDto>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    let response = state.accounts.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login<S, I>(
    State(state): State<AppState<S, I>>,
    ApiJson(request): ApiJson<LoginDto>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Ok(Json(state.accounts.login(request).await?))
}

async fn me<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Ok(Json(state.accounts.me(&auth.principal).await?))
}

async fn logout<S, I>(State(state): State<AppState<S, I>>, auth: Authenticated) -> StatusCode
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    state.accounts.logout(&auth.token).await;
    StatusCode::NO_CONTENT
}

// Shops

async fn list_shops<S, I>(
    State(state): State<AppState<S, I>>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    let shops = state.shops.list_active_shops().await?;
    Ok(Json(ShopsResponse { shops }))
}

async fn get_shop<S, I>(
    State(state): State<AppState<S, I>>,
    ApiPath(shop_id): ApiPath<ShopId>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Ok(Json(state.shops.get_shop(shop_id).await?))
}

async fn list_shop_products<S, I>(
    State(state): State<AppState<S, I>>,
    ApiPath(shop_id): ApiPath<ShopId>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Ok(Json(state.shops.list_shop_products(shop_id).await?))
}

async fn create_shop<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
    ApiJson(request): ApiJson<CreateShopDto>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    let shop = state.shops.create_shop(&auth.principal, request).await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

async fn update_shop<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
    ApiPath(shop_id): ApiPath<ShopId>,
    ApiJson(request): ApiJson<UpdateShopDto>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Ok(Json(
        state
            .shops
            .update_shop(&auth.principal, shop_id, request)
            .await?,
    ))
}

// Products

async fn list_products<S, I>(
    State(state): State<AppState<S, I>>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    let products = state.products.list_active_products().await?;
    Ok(Json(ProductsResponse { products }))
}

async fn get_product<S, I>(
    State(state): State<AppState<S, I>>,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Ok(Json(state.products.get_product(product_id).await?))
}

async fn create_product<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
    ApiJson(request): ApiJson<CreateProductDto>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    let product = state
        .products
        .create_product(&auth.principal, request)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
    ApiPath(product_id): ApiPath<ProductId>,
    ApiJson(request): ApiJson<UpdateProductDto>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Ok(Json(
        state
            .products
            .update_product(&auth.principal, product_id, request)
            .await?,
    ))
}

async fn delete_product<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    state
        .products
        .delete_product(&auth.principal, product_id)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("Product {product_id} deleted"),
    }))
}

// Orders

fn authorize(auth: &Authenticated, capability: Capability) -> Result<(), ApiError> {
    require(&auth.principal, capability).map_err(|err| ServiceError::from(err).into())
}

async fn place_order<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    authorize(&auth, Capability::PlaceOrder)?;
    let request = ApiJson::<PlaceOrderRequestDto>::parse(&body)?;
    let order = state.place_order.execute(&auth.principal, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    let orders = state.order_queries.list_orders(&auth.principal).await?;
    Ok(Json(OrdersResponse { orders }))
}

async fn get_order<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
    ApiPath(order_id): ApiPath<OrderId>,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    Ok(Json(
        state
            .order_queries
            .get_order(&auth.principal, order_id)
            .await?,
    ))
}

async fn update_order_status<S, I>(
    State(state): State<AppState<S, I>>,
    auth: Authenticated,
    ApiPath(order_id): ApiPath<OrderId>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    authorize(&auth, Capability::ManageOrderStatus)?;
    let request = ApiJson::<UpdateOrderStatusDto>::parse(&body)?;
    Ok(Json(
        state
            .update_order_status
            .execute(&auth.principal, order_id, request)
            .await?,
    ))
}
