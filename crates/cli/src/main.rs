//! Cookie Haven CLI - Order history and checkout tools.
//!
//! # Usage
//!
//! ```bash
//! # List recorded orders
//! ch-cli orders list
//!
//! # Show one order, or the one the confirmation page would show
//! ch-cli orders show ORD-1773480413000
//! ch-cli orders last
//!
//! # Price a cart file with the configured shipping and tax rules
//! ch-cli quote cart.json
//!
//! # Format a payment field the way the checkout form does
//! ch-cli format card 4242424242424242
//! ```
//!
//! # Environment Variables
//!
//! - `COOKIE_HAVEN_DATA_DIR` - Order history directory (default: data)
//! - `COOKIE_HAVEN_CURRENCY` - Currency for printed amounts (default: php)
//! - `COOKIE_HAVEN_FREE_SHIPPING_THRESHOLD`, `COOKIE_HAVEN_SHIPPING_FEE`,
//!   `COOKIE_HAVEN_TAX_RATE` - Pricing rules for `quote`, shared with the server

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ch-cli")]
#[command(author, version, about = "Cookie Haven CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect order history
    Orders {
        /// Order history directory (overrides `COOKIE_HAVEN_DATA_DIR`)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Price a cart JSON file
    Quote {
        /// Path to a JSON array of cart lines
        cart: PathBuf,

        /// Pricing rules as "threshold,fee,rate" (default: configured rules)
        #[arg(short, long)]
        policy: Option<String>,
    },
    /// Format a payment field as the checkout form would
    Format {
        /// Which field to format
        field: commands::format::Field,

        /// Raw input
        value: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List every recorded order
    List,
    /// Show a single order
    Show {
        /// Order ID (e.g. ORD-1773480413000)
        id: String,
    },
    /// Show the order the confirmation page would display
    Last,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Orders { data_dir, action } => {
            let dir = data_dir.unwrap_or_else(commands::orders::default_data_dir);
            match action {
                OrdersAction::List => commands::orders::list(&dir).await?,
                OrdersAction::Show { id } => commands::orders::show(&dir, &id).await?,
                OrdersAction::Last => commands::orders::last(&dir).await?,
            }
        }
        Commands::Quote { cart, policy } => commands::quote::run(&cart, policy.as_deref())?,
        Commands::Format { field, value } => commands::write_line(&field.apply(&value))?,
    }
    Ok(())
}
