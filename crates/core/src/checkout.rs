//! Checkout form validation and checkout gating.
//!
//! Validation collects every failing field at once so the client can mark
//! them all; each message is keyed by the form's camelCase field name.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::{Email, PaymentMethod};

static EXPIRY_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a compile-time constant
    Regex::new(r"^\d{2}/\d{2}$").unwrap()
});

const CARD_NUMBER_DIGITS: usize = 16;
const GCASH_NUMBER_DIGITS: usize = 11;
const MIN_CVV_LENGTH: usize = 3;

/// Country preselected on the shipping form.
pub const DEFAULT_COUNTRY: &str = "Philippines";

/// Shipping and contact details from the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_owned(),
        }
    }
}

impl ShippingInfo {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Single-line address: "street, city, state zip, country".
    #[must_use]
    pub fn formatted_address(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.address.trim(),
            self.city.trim(),
            self.state.trim(),
            self.zip_code.trim(),
            self.country.trim()
        )
    }
}

/// Payment details from the checkout form.
///
/// Only the fields for the selected method are validated. None of these are
/// ever stored with the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentInfo {
    pub payment_method: PaymentMethod,
    pub card_number: String,
    pub card_name: String,
    pub expiry_date: String,
    pub cvv: String,
    pub gcash_number: String,
    pub gcash_name: String,
}

/// The contact shape sent along with a hosted checkout request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutContact {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<&ShippingInfo> for CheckoutContact {
    fn from(info: &ShippingInfo) -> Self {
        Self {
            full_name: info.full_name(),
            email: info.email.trim().to_owned(),
            phone: info.phone.trim().to_owned(),
            address: info.formatted_address(),
        }
    }
}

/// Per-field validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(BTreeMap<&'static str, &'static str>);

impl ValidationErrors {
    pub(crate) fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    fn require(&mut self, field: &'static str, value: &str, message: &'static str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            return false;
        }
        true
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    /// Whether `field` failed.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

/// Validate the shipping and payment sections of the checkout form.
///
/// # Errors
///
/// Returns every failing field with its user-facing message.
pub fn validate(shipping: &ShippingInfo, payment: &PaymentInfo) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    validate_shipping(shipping, &mut errors);

    match payment.payment_method {
        PaymentMethod::Card => validate_card(payment, &mut errors),
        PaymentMethod::Gcash => validate_gcash(payment, &mut errors),
        PaymentMethod::Cash => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_shipping(info: &ShippingInfo, errors: &mut ValidationErrors) {
    errors.require("firstName", &info.first_name, "First name is required");
    errors.require("lastName", &info.last_name, "Last name is required");
    if errors.require("email", &info.email, "Email is required") && Email::parse(&info.email).is_err()
    {
        errors.add("email", "Email is invalid");
    }
    errors.require("phone", &info.phone, "Phone is required");
    errors.require("address", &info.address, "Address is required");
    errors.require("city", &info.city, "City is required");
    errors.require("state", &info.state, "State/Province is required");
    errors.require("zipCode", &info.zip_code, "ZIP code is required");
}

fn validate_card(payment: &PaymentInfo, errors: &mut ValidationErrors) {
    if errors.require("cardNumber", &payment.card_number, "Card number is required")
        && !is_digit_run(&payment.card_number, CARD_NUMBER_DIGITS)
    {
        errors.add("cardNumber", "Card number must be 16 digits");
    }
    errors.require("cardName", &payment.card_name, "Cardholder name is required");
    if errors.require("expiryDate", &payment.expiry_date, "Expiry date is required")
        && !EXPIRY_SHAPE.is_match(&payment.expiry_date)
    {
        errors.add("expiryDate", "Invalid format (MM/YY)");
    }
    if errors.require("cvv", &payment.cvv, "CVV is required")
        && payment.cvv.chars().count() < MIN_CVV_LENGTH
    {
        errors.add("cvv", "CVV must be 3-4 digits");
    }
}

fn validate_gcash(payment: &PaymentInfo, errors: &mut ValidationErrors) {
    if errors.require("gcashNumber", &payment.gcash_number, "GCash number is required")
        && !is_digit_run(&payment.gcash_number, GCASH_NUMBER_DIGITS)
    {
        errors.add("gcashNumber", "GCash number must be 11 digits");
    }
    errors.require("gcashName", &payment.gcash_name, "Account name is required");
}

/// Exactly `len` ASCII digits once whitespace is removed.
fn is_digit_run(value: &str, len: usize) -> bool {
    let mut count = 0;
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if !c.is_ascii_digit() {
            return false;
        }
        count += 1;
    }
    count == len
}

/// Where a shopper lands when they open checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutEntry {
    /// The cart has items; show the checkout form.
    Proceed,
    /// Nothing to check out; send the shopper back to the cart.
    RedirectToCart,
}

impl CheckoutEntry {
    /// Client path of the cart page.
    pub const CART_PATH: &'static str = "/cart";
}

/// Decide whether a cart may enter checkout.
#[must_use]
pub fn checkout_entry(cart: &Cart) -> CheckoutEntry {
    if cart.is_empty() {
        CheckoutEntry::RedirectToCart
    } else {
        CheckoutEntry::Proceed
    }
}
