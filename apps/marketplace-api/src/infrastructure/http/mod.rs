//! HTTP/REST API adapter.
//!
//! Inbound adapter implementing REST endpoints that delegate to application use cases.

mod controller;
mod extractors;
mod response;

pub use controller::{AppState, create_router};
pub use extractors::{ApiJson, ApiPath, Authenticated, BearerToken};
pub use response::*;
