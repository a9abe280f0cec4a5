//! Order Aggregate Root
//!
//! An order is written once by the placement transaction. After that only
//! its status and `updated_at` move.

use super::OrderLine;
use crate::domain::ordering::value_objects::OrderStatus;
use crate::domain::shared::{Money, OrderId, ShopId, Timestamp, UserId};

/// Parameters for reconstituting an Order from storage.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    /// Order identifier.
    pub id: OrderId,
    /// Placing user.
    pub user_id: UserId,
    /// Target shop.
    pub shop_id: ShopId,
    /// Stored total.
    pub total_amount: Money,
    /// Current status.
    pub status: OrderStatus,
    /// Free-text note.
    pub note: String,
    /// Lines in placement order.
    pub lines: Vec<OrderLine>,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Order Aggregate Root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    shop_id: ShopId,
    total_amount: Money,
    status: OrderStatus,
    note: String,
    lines: Vec<OrderLine>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Order {
    /// Rebuild an order from persisted state.
    #[must_use]
    pub fn reconstitute(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            shop_id: record.shop_id,
            total_amount: record.total_amount,
            status: record.status,
            note: record.note,
            lines: record.lines,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Order identifier.
    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Placing user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Target shop.
    #[must_use]
    pub const fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    /// Total amount charged.
    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Free-text note.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Lines in placement order.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Sum of line subtotals. Equals `total_amount` for every stored order.
    #[must_use]
    pub fn lines_total(&self) -> Money {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }

    /// Set a new status and return the previous one. Totals and lines are
    /// untouched.
    pub fn change_status(&mut self, status: OrderStatus, at: Timestamp) -> OrderStatus {
        let previous = self.status;
        self.status = status;
        self.updated_at = at;
        previous
    }
}
