//! Ordering value objects.

mod command;
mod order_status;
mod transition_policy;

pub use command::{OrderLineRequest, PlaceOrderCommand};
pub use order_status::OrderStatus;
pub use transition_policy::TransitionPolicy;
