//! Strongly-typed identifiers for marketplace entities.
//!
//! Storage assigns every identifier (autoincrement semantics), so each one
//! wraps a plain `i64`. The newtypes keep a `ProductId` from being passed
//! where a `ShopId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw storage identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw storage identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(UserId, "Identifier of a registered user account.");
define_id!(ShopId, "Identifier of a merchant storefront.");
define_id!(ProductId, "Identifier of a sellable product.");
define_id!(OrderId, "Identifier of a placed order.");
define_id!(OrderLineId, "Identifier of a single line within an order.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrips_raw_value() {
        let id = ProductId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(ProductId::from(42), id);
    }

    #[test]
    fn id_displays_raw_value() {
        assert_eq!(ShopId::new(7).to_string(), "7");
    }

    #[test]
    fn id_serializes_transparently() {
        let json = serde_json::to_string(&OrderId::new(15)).unwrap();
        assert_eq!(json, "15");

        let parsed: UserId = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, UserId::new(3));
    }

    #[test]
    fn ids_order_by_value() {
        let mut ids = vec![OrderId::new(3), OrderId::new(1), OrderId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![OrderId::new(1), OrderId::new(2), OrderId::new(3)]);
    }
}
