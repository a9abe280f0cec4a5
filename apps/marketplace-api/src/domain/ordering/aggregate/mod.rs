//! Order aggregate and its pre-persistence draft.

mod draft;
mod order;
mod order_line;

pub use draft::{DraftLine, OrderDraft};
pub use order::{Order, OrderRecord};
pub use order_line::OrderLine;
