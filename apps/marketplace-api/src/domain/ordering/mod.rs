//! Ordering Bounded Context
//!
//! Everything about turning a customer's cart into an immutable order and
//! moving that order through its lifecycle afterwards.
//!
//! - [`PlaceOrderCommand`] validates the cart shape before any storage is touched.
//! - [`services::validate_line`] runs the per-line eligibility checks inside
//!   the placement unit of work.
//! - [`OrderDraft`] is the write set: frozen line prices plus the running total.
//! - [`OrderStateMachine`] decides which status changes are accepted.

pub mod aggregate;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use aggregate::{DraftLine, Order, OrderDraft, OrderLine, OrderRecord};
pub use errors::OrderError;
pub use services::{OrderStateMachine, validate_line};
pub use value_objects::{OrderLineRequest, OrderStatus, PlaceOrderCommand, TransitionPolicy};
