//! Payment field formatting.
//!
//! # Usage
//!
//! ```bash
//! ch-cli format card "4242-4242-4242-4242"   # 4242 4242 4242 4242
//! ch-cli format expiry 1228                  # 12/28
//! ch-cli format gcash 09171234567            # 0917 123 4567
//! ```

use clap::ValueEnum;
use cookie_haven_core::format;

/// A formattable checkout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Card,
    Expiry,
    Cvv,
    Gcash,
}

impl Field {
    /// Format raw input for this field.
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Card => format::card_number(value),
            Self::Expiry => format::expiry_date(value),
            Self::Cvv => format::cvv(value),
            Self::Gcash => format::gcash_number(value),
        }
    }
}
