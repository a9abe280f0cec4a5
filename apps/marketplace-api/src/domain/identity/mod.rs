//! Identity Bounded Context
//!
//! Users, roles, and the access-control predicates every use case runs
//! before touching business state.

pub mod access;
pub mod principal;
pub mod role;
pub mod user;

pub use access::{AccessError, Capability, OrderScope, can_view, require, require_shop_owner};
pub use principal::Principal;
pub use role::Role;
pub use user::{NewUser, User};
