//! CLI command implementations.

pub mod format;
pub mod orders;
pub mod quote;

use std::io::Write;

use cookie_haven_core::CurrencyCode;

/// Write a line of command output to stdout.
///
/// # Errors
///
/// Returns error if stdout is closed.
pub fn write_line(line: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")
}

/// Currency used when printing amounts.
pub fn currency() -> CurrencyCode {
    std::env::var("COOKIE_HAVEN_CURRENCY")
        .ok()
        .and_then(|code| code.parse().ok())
        .unwrap_or_default()
}
