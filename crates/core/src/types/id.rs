//! Newtype IDs for type-safe entity references.
//!
//! Cookie Haven identifiers are strings minted by whoever creates the record
//! (the web client for products, the order pipeline for orders). Use the
//! `define_id!` macro to create wrappers that prevent mixing them up.

use serde::{Deserialize, Deserializer, Serialize};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `Display`, `From<String>` and `From<&str>`
///
/// # Example
///
/// ```rust
/// # use cookie_haven_core::define_id;
/// define_id!(CouponId);
/// define_id!(GiftCardId);
///
/// let coupon = CouponId::new("SPRING");
/// assert_eq!(coupon.as_str(), "SPRING");
///
/// // These are different types, so this won't compile:
/// // let _: GiftCardId = coupon;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

define_id!(OrderId);
define_id!(OrderItemId);
define_id!(UserId);
define_id!(CheckoutSessionId);

impl OrderId {
    /// Prefix of every order identifier.
    pub const PREFIX: &'static str = "ORD";

    /// Mint an order ID from a Unix timestamp in milliseconds.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{}-{millis}", Self::PREFIX))
    }
}

impl OrderItemId {
    /// Prefix of every order line identifier.
    pub const PREFIX: &'static str = "ITEM";

    /// Mint an order item ID from a timestamp and a per-line unique suffix.
    #[must_use]
    pub fn from_parts(millis: i64, suffix: &str) -> Self {
        Self(format!("{}-{millis}-{suffix}", Self::PREFIX))
    }
}

impl UserId {
    /// The user recorded on orders placed without an account.
    pub const GUEST: &'static str = "guest";

    /// The guest user.
    #[must_use]
    pub fn guest() -> Self {
        Self(Self::GUEST.to_owned())
    }

    /// Whether this is the anonymous guest user.
    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.0 == Self::GUEST
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::guest()
    }
}

/// Product identifier from the catalog.
///
/// The web client sends catalog IDs as either JSON numbers or strings, so
/// deserialization accepts both and normalizes to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_from_millis() {
        assert_eq!(
            OrderId::from_millis(1_700_000_000_123).as_str(),
            "ORD-1700000000123"
        );
    }

    #[test]
    fn test_order_item_id_from_parts() {
        assert_eq!(
            OrderItemId::from_parts(42, "abc").to_string(),
            "ITEM-42-abc"
        );
    }

    #[test]
    fn test_user_id_defaults_to_guest() {
        let user = UserId::default();
        assert!(user.is_guest());
        assert_eq!(user.as_str(), "guest");
        assert!(!UserId::new("u-1").is_guest());
    }

    #[test]
    fn test_product_id_accepts_numbers_and_strings() {
        let from_number: ProductId = serde_json::from_str("7").unwrap();
        let from_string: ProductId = serde_json::from_str("\"choc-chip\"").unwrap();
        assert_eq!(from_number.as_str(), "7");
        assert_eq!(from_string.as_str(), "choc-chip");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&OrderId::new("ORD-1")).unwrap();
        assert_eq!(json, "\"ORD-1\"");
    }
}
