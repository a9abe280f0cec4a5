//! Order State Machine Service
//!
//! Validates status changes requested by the owning shop.

use crate::domain::ordering::errors::OrderError;
use crate::domain::ordering::value_objects::{OrderStatus, TransitionPolicy};

/// Order State Machine for validating transitions.
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a move follows the lifecycle graph: one step forward, or
    /// cancellation of a non-terminal order.
    #[must_use]
    pub fn is_forward_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Preparing)
                | (OrderStatus::Preparing, OrderStatus::Ready)
                | (OrderStatus::Ready, OrderStatus::Delivered)
        ) || (to == OrderStatus::Cancelled && !from.is_terminal())
    }

    /// Validate a status change under `policy`.
    ///
    /// `Permissive` accepts any recognized status from any other; `Strict`
    /// only accepts moves along the lifecycle graph.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidTransition` when a strict policy refuses the move.
    pub fn validate_transition(
        from: OrderStatus,
        to: OrderStatus,
        policy: TransitionPolicy,
    ) -> Result<(), OrderError> {
        match policy {
            TransitionPolicy::Permissive => Ok(()),
            TransitionPolicy::Strict if Self::is_forward_transition(from, to) => Ok(()),
            TransitionPolicy::Strict => Err(OrderError::InvalidTransition { from, to }),
        }
    }

    /// Get the statuses reachable from `from` along the lifecycle graph.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|to| Self::is_forward_transition(from, *to))
            .collect()
    }
}
