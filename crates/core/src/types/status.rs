//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Order status at the time it is recorded.
///
/// Cash-on-delivery orders wait for payment and start as `Pending`; orders
/// paid up front start as `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
}

impl OrderStatus {
    /// Initial status for an order paid with `method`.
    #[must_use]
    pub const fn initial_for(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Pending,
            PaymentMethod::Card | PaymentMethod::Gcash => Self::Processing,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.pad("pending"),
            Self::Processing => f.pad("processing"),
        }
    }
}

/// Payment method selected on the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit/debit card.
    #[default]
    Card,
    /// GCash mobile wallet.
    Gcash,
    /// Cash on delivery.
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => f.pad("card"),
            Self::Gcash => f.pad("gcash"),
            Self::Cash => f.pad("cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "gcash" => Ok(Self::Gcash),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
