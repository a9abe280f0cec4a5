//! Access-control predicates shared by every use case.
//!
//! Role checks go through [`require`]; ownership checks go through
//! [`require_shop_owner`]; order reads go through [`OrderScope`] and
//! [`can_view`]. Handlers never compare roles themselves.

use std::fmt;

use super::{Principal, Role};
use crate::domain::catalog::Shop;
use crate::domain::ordering::Order;
use crate::domain::shared::{ShopId, UserId};

/// Authenticated but not allowed to perform the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Wrong role or not the owner.
    Forbidden {
        /// Human-readable reason.
        reason: String,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden { reason } => write!(f, "Forbidden: {reason}"),
        }
    }
}

impl std::error::Error for AccessError {}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Initiate an order placement.
    PlaceOrder,
    /// Create or edit the user's own shop.
    ManageShop,
    /// Create, edit or delete products of the user's own shop.
    ManageCatalog,
    /// Move orders of the user's own shop through their lifecycle.
    ManageOrderStatus,
}

impl Capability {
    /// The role that holds this capability.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::PlaceOrder => Role::Customer,
            Self::ManageShop | Self::ManageCatalog | Self::ManageOrderStatus => Role::Shop,
        }
    }

    const fn action(self) -> &'static str {
        match self {
            Self::PlaceOrder => "place orders",
            Self::ManageShop => "manage shops",
            Self::ManageCatalog => "manage products",
            Self::ManageOrderStatus => "update order status",
        }
    }
}

/// Check that `principal` holds `capability`.
///
/// # Errors
///
/// Returns `AccessError::Forbidden` naming the required role.
pub fn require(principal: &Principal, capability: Capability) -> Result<(), AccessError> {
    let role = capability.required_role();
    if principal.has_role(role) {
        Ok(())
    } else {
        Err(AccessError::Forbidden {
            reason: format!("only {role} accounts may {}", capability.action()),
        })
    }
}

/// Check that `principal` owns `shop`.
///
/// # Errors
///
/// Returns `AccessError::Forbidden` for any other user.
pub fn require_shop_owner(principal: &Principal, shop: &Shop) -> Result<(), AccessError> {
    if shop.is_owned_by(principal.user_id) {
        Ok(())
    } else {
        Err(AccessError::Forbidden {
            reason: format!("shop {} belongs to another user", shop.id),
        })
    }
}

/// The set of orders a principal may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// Orders placed by one customer.
    Customer(UserId),
    /// Orders placed against one shop.
    Shop(ShopId),
    /// Every order.
    All,
}

impl OrderScope {
    /// Returns true if `order` falls inside this scope.
    #[must_use]
    pub fn includes(&self, order: &Order) -> bool {
        match self {
            Self::Customer(user_id) => order.user_id() == *user_id,
            Self::Shop(shop_id) => order.shop_id() == *shop_id,
            Self::All => true,
        }
    }
}

/// Order visibility: customers see their own orders, shop owners see orders
/// against their shop, admins see everything.
///
/// `owned_shop` is the shop owned by `principal`, if any.
#[must_use]
pub fn can_view(principal: &Principal, order: &Order, owned_shop: Option<&Shop>) -> bool {
    match principal.role {
        Role::Admin => true,
        Role::Customer => order.user_id() == principal.user_id,
        Role::Shop => owned_shop.is_some_and(|shop| {
            shop.is_owned_by(principal.user_id) && shop.id == order.shop_id()
        }),
    }
}
