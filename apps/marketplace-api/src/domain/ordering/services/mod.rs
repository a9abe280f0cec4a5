//! Ordering domain services.

mod line_validation;
mod order_state_machine;

pub use line_validation::validate_line;
pub use order_state_machine::OrderStateMachine;
