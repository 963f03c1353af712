//! Products, box-size variants and cart lines.
//!
//! The cart lives on the client; these types describe the JSON it sends
//! when checking out.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::ProductId;

/// A catalog product as referenced by a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    #[serde(default = "ProductId::unknown")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the store currency's standard unit.
    pub price: Decimal,
    /// Image reference (URL or asset key).
    #[serde(default)]
    pub image: String,
}

impl ProductId {
    fn unknown() -> Self {
        Self::new("")
    }
}

/// Box-size variant of a cookie box.
///
/// Known sizes are modelled; anything else the catalog invents is kept
/// verbatim so it still reaches the payment provider's line-item name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoxSize {
    Regular,
    Small,
    Medium,
    Large,
    Other(String),
}

impl BoxSize {
    /// Wire form, as sent by the client (lowercase for known sizes).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Regular => "regular",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Other(s) => s,
        }
    }

    /// Label with the first letter capitalized ("large" -> "Large").
    #[must_use]
    pub fn label(&self) -> String {
        capitalize(self.as_str())
    }

    /// Label for an optional size; no size means a regular box.
    #[must_use]
    pub fn label_or_regular(size: Option<&Self>) -> String {
        size.map_or_else(|| Self::Regular.label(), Self::label)
    }
}

impl From<&str> for BoxSize {
    fn from(s: &str) -> Self {
        match s {
            "regular" => Self::Regular,
            "small" => Self::Small,
            "medium" => Self::Medium,
            "large" => Self::Large,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl Serialize for BoxSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BoxSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// Empty strings count as "no size selected", same as a missing field.
fn deserialize_box_size<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BoxSize>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .map(|s| BoxSize::from(s.as_str())))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    #[serde(
        default,
        deserialize_with = "deserialize_box_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub box_size: Option<BoxSize>,
}

impl CartLine {
    /// Create a cart line.
    #[must_use]
    pub const fn new(product: Product, quantity: u32, box_size: Option<BoxSize>) -> Self {
        Self {
            product,
            quantity,
            box_size,
        }
    }

    /// Unit price times quantity, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Display name including the box size, e.g. "Choco Chip - Large Box".
    #[must_use]
    pub fn display_name(&self) -> String {
        format!(
            "{} - {} Box",
            self.product.name,
            BoxSize::label_or_regular(self.box_size.as_ref())
        )
    }

    /// Short variant description, e.g. "Large box".
    #[must_use]
    pub fn variant_description(&self) -> String {
        format!("{} box", BoxSize::label_or_regular(self.box_size.as_ref()))
    }
}

/// The full cart, in the order the client listed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<CartLine>);

impl Cart {
    /// Create a cart from lines.
    #[must_use]
    pub const fn new(lines: Vec<CartLine>) -> Self {
        Self(lines)
    }

    /// Cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.0
    }

    /// Number of lines (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of units across lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.0.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.0.iter()
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self(lines)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::str::FromStr;

    use super::*;

    pub(crate) fn product(name: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(name.to_lowercase().replace(' ', "-")),
            name: name.to_owned(),
            price: Decimal::from_str(price).unwrap(),
            image: format!("{}.png", name.to_lowercase()),
        }
    }

    #[test]
    fn test_display_name_with_box_size() {
        let line = CartLine::new(product("Choco Chip", "5.50"), 2, Some(BoxSize::Large));
        assert_eq!(line.display_name(), "Choco Chip - Large Box");
        assert_eq!(line.variant_description(), "Large box");
    }

    #[test]
    fn test_display_name_defaults_to_regular() {
        let line = CartLine::new(product("Oatmeal", "3"), 1, None);
        assert_eq!(line.display_name(), "Oatmeal - Regular Box");
        assert_eq!(line.variant_description(), "Regular box");
    }

    #[test]
    fn test_unknown_box_size_is_capitalized() {
        let line = CartLine::new(product("Sugar", "2"), 1, Some(BoxSize::from("party")));
        assert_eq!(line.display_name(), "Sugar - Party Box");
    }

    #[test]
    fn test_line_total() {
        let line = CartLine::new(product("Sugar", "2.25"), 4, None);
        assert_eq!(line.line_total(), Some(Decimal::from(9)));

        let huge = CartLine::new(
            Product {
                price: Decimal::MAX,
                ..product("Tin", "1")
            },
            2,
            None,
        );
        assert_eq!(huge.line_total(), None);
    }

    #[test]
    fn test_deserialize_client_payload() {
        let json = r#"[
            {"product": {"id": 3, "name": "Choco Chip", "price": 5.5, "image": "cc.png"},
             "quantity": 2, "boxSize": "medium"},
            {"product": {"id": "oat", "name": "Oatmeal", "price": "3.25"},
             "quantity": 1, "boxSize": ""}
        ]"#;

        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 3);

        let first = &cart.lines()[0];
        assert_eq!(first.product.id.as_str(), "3");
        assert_eq!(first.product.price, Decimal::from_str("5.5").unwrap());
        assert_eq!(first.box_size, Some(BoxSize::Medium));

        let second = &cart.lines()[1];
        assert_eq!(second.box_size, None);
        assert_eq!(second.product.image, "");
    }
}
