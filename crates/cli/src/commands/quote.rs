//! Cart pricing command.
//!
//! # Usage
//!
//! ```bash
//! # cart.json: [{"product": {"id": 1, "name": "Choco Chip", "price": 5}, "quantity": 2}]
//! ch-cli quote cart.json
//! COOKIE_HAVEN_TAX_RATE=0.12 ch-cli quote cart.json
//! ch-cli quote cart.json --policy 30,5,0.12
//! ```

use std::path::{Path, PathBuf};

use cookie_haven_core::{Cart, CurrencyCode, Price, PricingError, PricingPolicy, Totals};
use cookie_haven_server::config::{ConfigError, pricing_from_env};
use thiserror::Error;

use super::{currency, write_line};

/// Errors that can occur while quoting a cart.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid cart file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid pricing policy: {0}")]
    Policy(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Price the cart at `path` and print the breakdown.
///
/// Uses `--policy` when given, otherwise the same `COOKIE_HAVEN_*` pricing
/// variables the server reads.
pub fn run(path: &Path, policy: Option<&str>) -> Result<(), QuoteError> {
    let policy = resolve_policy(policy, pricing_from_env)?;

    let cart = read_cart(path)?;
    let totals = policy.quote(&cart)?;
    tracing::debug!(lines = cart.len(), items = cart.item_count(), "Cart priced");

    write_line(&render(&totals, currency()))?;
    Ok(())
}

fn resolve_policy(
    raw: Option<&str>,
    configured: impl FnOnce() -> Result<PricingPolicy, ConfigError>,
) -> Result<PricingPolicy, QuoteError> {
    match raw {
        Some(raw) => raw.parse().map_err(QuoteError::Policy),
        None => Ok(configured()?),
    }
}

fn read_cart(path: &Path) -> Result<Cart, QuoteError> {
    let bytes = std::fs::read(path).map_err(|source| QuoteError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| QuoteError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn render(totals: &Totals, currency: CurrencyCode) -> String {
    let shipping = if totals.shipping().is_zero() {
        "FREE".to_string()
    } else {
        Price::new(totals.shipping(), currency).to_string()
    };

    format!(
        "Subtotal:  {}\nShipping:  {shipping}\nTax:       {}\nTotal:     {}",
        Price::new(totals.subtotal(), currency),
        Price::new(totals.tax(), currency),
        Price::new(totals.total(), currency),
    )
}
