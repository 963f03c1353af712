//! Cookie Haven Core - Shared domain library.
//!
//! This crate provides the types and pure business rules used across all
//! Cookie Haven components:
//! - `server` - Payment-session and order HTTP service
//! - `cli` - Command-line tools for inspecting orders and quoting carts
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O,
//! no HTTP clients, no clocks. Callers pass in timestamps and identifiers so
//! everything here is deterministic and unit-testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`cart`] - Products, box-size variants and cart lines
//! - [`pricing`] - Subtotal, shipping and tax computation
//! - [`checkout`] - Shipping/payment form validation and checkout gating
//! - [`format`] - Payment field input formatters
//! - [`order`] - Order records assembled from a validated checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod format;
pub mod order;
pub mod pricing;
pub mod types;

pub use cart::{BoxSize, Cart, CartLine, Product};
pub use checkout::{
    CheckoutContact, CheckoutEntry, PaymentInfo, ShippingInfo, ValidationErrors, checkout_entry,
    validate,
};
pub use order::{ContactInfo, Order, OrderError, OrderItem, OrderRequest};
pub use pricing::{PricingError, PricingPolicy, Totals};
pub use types::*;
