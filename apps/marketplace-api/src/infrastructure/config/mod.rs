//! Application wiring.

mod container;

pub use container::{Container, connect_sqlite};
