//! Place Order Use Case
//!
//! The order placement transaction. Stock check, stock decrement, and the
//! order insert all happen inside one unit of work, so two concurrent
//! placements can never both consume the same units.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::application::dto::{OrderDetailsDto, OrderLineDto, PlaceOrderRequestDto};
use crate::application::errors::ServiceError;
use crate::application::ports::{MarketplaceStore, TransactionalStore, UnitOfWork};
use crate::domain::catalog::CatalogError;
use crate::domain::identity::{Capability, Principal, require};
use crate::domain::ordering::{Order, OrderDraft, OrderError, PlaceOrderCommand, validate_line};
use crate::domain::shared::{ProductId, Timestamp, UserId};
use crate::error::ErrorCode;
use crate::observability::{record_order_placement, record_placement_retry};

use super::OrderDetailsAssembler;

/// Delay ceiling before the first re-run; doubles per attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(5);
/// Upper bound on any single delay between attempts.
const RETRY_MAX_DELAY: Duration = Duration::from_millis(100);

/// Use case for placing an order against one shop.
pub struct PlaceOrderUseCase<S: MarketplaceStore> {
    store: Arc<S>,
    details: OrderDetailsAssembler<S>,
    max_attempts: u32,
}

impl<S: MarketplaceStore> PlaceOrderUseCase<S> {
    /// Attempts made when the storage layer reports a retryable failure.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Create a new PlaceOrderUseCase.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_max_attempts(store, Self::DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a use case that runs the unit of work at most `max_attempts` times.
    pub fn with_max_attempts(store: Arc<S>, max_attempts: u32) -> Self {
        Self {
            details: OrderDetailsAssembler::new(Arc::clone(&store)),
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Execute the use case.
    ///
    /// On success the order is committed and returned with shop and line
    /// detail attached. On failure nothing was written: once the unit has
    /// committed this never returns an error.
    #[tracing::instrument(
        name = "order.place",
        skip_all,
        fields(user_id = %principal.user_id, shop_id = %request.shop_id)
    )]
    pub async fn execute(
        &self,
        principal: &Principal,
        request: PlaceOrderRequestDto,
    ) -> Result<OrderDetailsDto, ServiceError> {
        let started = Instant::now();
        let line_count = request.items.len();

        let result = self.place(principal, request).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(order) => {
                record_order_placement("placed", line_count, elapsed);
                tracing::info!(
                    order_id = %order.id,
                    total_amount = %order.total_amount,
                    lines = line_count,
                    "Order placed"
                );
            }
            Err(err) => {
                let code = ErrorCode::from(err);
                record_order_placement(code.reason(), line_count, elapsed);
                if code.is_server_error() {
                    tracing::error!(error = %err, "Order placement failed");
                } else {
                    tracing::info!(reason = code.reason(), error = %err, "Order placement rejected");
                }
            }
        }

        result
    }

    async fn place(
        &self,
        principal: &Principal,
        request: PlaceOrderRequestDto,
    ) -> Result<OrderDetailsDto, ServiceError> {
        require(principal, Capability::PlaceOrder)?;
        let command = request.into_command()?;

        let shop_id = command.shop_id();
        let shop = self
            .store
            .get_shop(shop_id)
            .await?
            .ok_or(OrderError::ShopNotFound { shop_id })?;
        if !shop.is_active {
            return Err(OrderError::ShopInactive { shop_id }.into());
        }

        let order = self.run_transaction(principal.user_id, &command).await?;
        Ok(self.describe(&order).await)
    }

    /// Attach shop, customer and product detail to a committed order.
    ///
    /// A failed lookup leaves that detail out rather than reporting an
    /// error for an order that already exists.
    async fn describe(&self, order: &Order) -> OrderDetailsDto {
        match self.details.assemble(order).await {
            Ok(details) => details,
            Err(err) => {
                tracing::warn!(
                    order_id = %order.id(),
                    error = %err,
                    "Order committed, detail lookup failed"
                );
                let items = order
                    .lines()
                    .iter()
                    .map(|line| OrderLineDto::from_line(line, None))
                    .collect();
                OrderDetailsDto::new(order, None, None, items)
            }
        }
    }

    /// Run the unit of work, re-running it from scratch while storage
    /// reports a retryable failure and attempts remain.
    async fn run_transaction(
        &self,
        user_id: UserId,
        command: &PlaceOrderCommand,
    ) -> Result<Order, ServiceError> {
        let mut attempt = 1;
        loop {
            match self.attempt(user_id, command).await {
                Err(ServiceError::Persistence(err))
                    if err.is_retryable() && attempt < self.max_attempts =>
                {
                    let delay = retry_delay(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %err,
                        "Placement unit of work failed, retrying"
                    );
                    record_placement_retry(err.reason());
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn attempt(
        &self,
        user_id: UserId,
        command: &PlaceOrderCommand,
    ) -> Result<Order, ServiceError> {
        let mut unit = self.store.begin().await?;

        match Self::stage(&mut unit, user_id, command).await {
            Ok(order) => {
                unit.commit().await?;
                Ok(order)
            }
            Err(err) => {
                if let Err(rollback_err) = unit.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Validate and stage every line, then stage the order itself.
    async fn stage(
        unit: &mut <S as TransactionalStore>::Unit,
        user_id: UserId,
        command: &PlaceOrderCommand,
    ) -> Result<Order, ServiceError> {
        let shop_id = command.shop_id();
        let mut draft = OrderDraft::new(user_id, shop_id, command.note());

        for line in command.lines() {
            let product_id = line.product_id;
            let mut product = unit
                .get_product(product_id)
                .await?
                .ok_or(OrderError::ProductNotFound { product_id })?;

            validate_line(shop_id, &product, line.quantity)?;
            product
                .decrement_stock(line.quantity, Timestamp::now())
                .map_err(|err| insufficient_stock(product_id, err))?;
            unit.save_product(&product).await?;

            draft.add_line(&product, line.quantity)?;
        }

        Ok(unit.insert_order(&draft).await?)
    }
}

/// Jittered exponential delay after failed attempt `attempt` (1-based).
/// Racing units that conflicted once do not re-run in lockstep.
fn retry_delay(attempt: u32) -> Duration {
    let ceiling = RETRY_BASE_DELAY
        .saturating_mul(1 << attempt.saturating_sub(1).min(5))
        .min(RETRY_MAX_DELAY);
    let ceiling_ms = u64::try_from(ceiling.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rand::thread_rng().gen_range(ceiling_ms / 2..=ceiling_ms))
}

fn insufficient_stock(product_id: ProductId, err: CatalogError) -> ServiceError {
    match err {
        CatalogError::StockUnderflow {
            requested,
            available,
        } => OrderError::InsufficientStock {
            product_id,
            requested,
            available,
        }
        .into(),
        other => other.into(),
    }
}
