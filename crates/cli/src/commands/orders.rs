//! Order history commands.
//!
//! Reads the same files the server writes, so the CLI can inspect orders
//! while the server is running.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use cookie_haven_core::{CurrencyCode, Order, OrderId, Price};
use cookie_haven_server::store::{OrderStore, StoreError};
use rust_decimal::Decimal;
use thiserror::Error;

use super::{currency, write_line};

/// Errors that can occur during order commands.
#[derive(Debug, Error)]
pub enum OrdersError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("No orders recorded in {0}")]
    Empty(PathBuf),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Data directory from `COOKIE_HAVEN_DATA_DIR`, or `data`.
pub fn default_data_dir() -> PathBuf {
    std::env::var("COOKIE_HAVEN_DATA_DIR").map_or_else(|_| PathBuf::from("data"), PathBuf::from)
}

/// Print one summary line per order.
pub async fn list(dir: &Path) -> Result<(), OrdersError> {
    let store = OrderStore::open_existing(dir).await?;
    let orders = store.list().await?;
    tracing::info!(count = orders.len(), dir = %dir.display(), "Loaded order history");

    let currency = currency();
    for order in &orders {
        write_line(&summary_line(order, currency))?;
    }
    Ok(())
}

/// Print a single order in full.
pub async fn show(dir: &Path, id: &str) -> Result<(), OrdersError> {
    let store = OrderStore::open_existing(dir).await?;
    let order = store
        .get(&OrderId::new(id))
        .await?
        .ok_or_else(|| OrdersError::NotFound(id.to_owned()))?;
    write_line(&details(&order, currency()))?;
    Ok(())
}

/// Print the order the confirmation page would show.
pub async fn last(dir: &Path) -> Result<(), OrdersError> {
    let store = OrderStore::open_existing(dir).await?;
    let order = store
        .last()
        .await?
        .ok_or_else(|| OrdersError::Empty(dir.to_path_buf()))?;
    write_line(&details(&order, currency()))?;
    Ok(())
}

fn summary_line(order: &Order, currency: CurrencyCode) -> String {
    format!(
        "{}  {}  {:<10}  {:<5}  {:>3} item(s)  {}",
        order.id,
        order.date.format("%Y-%m-%d %H:%M"),
        order.status,
        order.payment_method,
        order.item_count(),
        Price::new(order.total, currency),
    )
}

fn details(order: &Order, currency: CurrencyCode) -> String {
    let money = |amount: Decimal| Price::new(amount, currency).to_string();
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Order {}", order.id);
    let _ = writeln!(out, "Placed:    {}", order.date.to_rfc3339());
    let _ = writeln!(out, "Status:    {}", order.status);
    let _ = writeln!(out, "Payment:   {}", order.payment_method);
    let _ = writeln!(
        out,
        "Customer:  {} <{}> {}",
        order.contact_info.name, order.contact_info.email, order.contact_info.phone
    );
    let _ = writeln!(out, "Ship to:   {}", order.shipping_address);
    let _ = writeln!(out);
    for item in &order.items {
        let _ = writeln!(
            out,
            "  {} x{}  {}",
            item.name,
            item.quantity,
            item.price
                .checked_mul(Decimal::from(item.quantity))
                .map_or_else(|| "overflow".to_string(), money)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Subtotal:  {}", money(order.subtotal));
    let _ = writeln!(out, "Shipping:  {}", money(order.shipping));
    let _ = writeln!(out, "Tax:       {}", money(order.tax));
    let _ = write!(out, "Total:     {}", money(order.total));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use cookie_haven_core::{
        ContactInfo, Email, OrderItem, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId,
    };

    use super::*;

    fn order() -> Order {
        let id = OrderId::from_millis(1_773_480_413_000);
        Order {
            id: id.clone(),
            user_id: UserId::guest(),
            date: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
            status: OrderStatus::Pending,
            shipping_address: "123 Main Street, Manila, Metro Manila 1000, Philippines"
                .to_string(),
            payment_method: PaymentMethod::Cash,
            subtotal: Decimal::new(1000, 2),
            tax: Decimal::new(80, 2),
            shipping: Decimal::new(499, 2),
            total: Decimal::new(1579, 2),
            items: vec![OrderItem {
                id: OrderItemId::from_parts(1_773_480_413_000, "a"),
                order_id: id,
                product_id: ProductId::new("1"),
                name: "Choco Chip".to_string(),
                price: Decimal::new(500, 2),
                quantity: 2,
                image: String::new(),
            }],
            contact_info: ContactInfo {
                email: Email::parse("juan@example.com").unwrap(),
                phone: "09171234567".to_string(),
                name: "Juan Dela Cruz".to_string(),
            },
        }
    }

    #[test]
    fn test_summary_line() {
        let line = summary_line(&order(), CurrencyCode::PHP);
        assert!(line.starts_with("ORD-1773480413000  2026-03-14 09:26"));
        assert!(line.contains("pending"));
        assert!(line.contains("2 item(s)"));
        assert!(line.ends_with("₱15.79"));
    }

    #[test]
    fn test_details() {
        let text = details(&order(), CurrencyCode::PHP);
        assert!(text.contains("Customer:  Juan Dela Cruz <juan@example.com> 09171234567"));
        assert!(text.contains("  Choco Chip x2  ₱10.00"));
        assert!(text.ends_with("Total:     ₱15.79"));
    }

    #[test]
    fn test_details_line_total_overflow() {
        let mut order = order();
        order.items[0].price = Decimal::MAX;
        let text = details(&order, CurrencyCode::PHP);
        assert!(text.contains("  Choco Chip x2  overflow"));
    }

    #[tokio::test]
    async fn test_missing_data_dir_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let typo = dir.path().join("dta");

        let err = list(&typo).await.unwrap_err();
        assert!(matches!(err, OrdersError::Store(StoreError::MissingDir(_))));
        assert!(!typo.exists());
    }

    #[tokio::test]
    async fn test_missing_order_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = show(dir.path(), "ORD-1").await.unwrap_err();
        assert!(matches!(err, OrdersError::NotFound(id) if id == "ORD-1"));

        let err = last(dir.path()).await.unwrap_err();
        assert!(matches!(err, OrdersError::Empty(_)));
    }
}
