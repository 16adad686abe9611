//! Paperback CLI - browse the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List a page of the catalog
//! pb-cli browse --page 1 --limit 12
//!
//! # Show one book
//! pb-cli show 3
//!
//! # Search with filters
//! pb-cli search "harbour" --category Fiction --max-price 20 --sort price
//!
//! # Check a coupon code
//! pb-cli coupon SAVE10
//!
//! # Track a shipment
//! pb-cli track TRK123456789
//!
//! # Order history for a user
//! pb-cli orders user-1
//! ```
//!
//! Connection settings come from the `PAPERBACK_*` environment variables;
//! set `PAPERBACK_USE_FIXTURES=true` to run entirely offline.

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI's job is to print.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "pb-cli")]
#[command(author, version, about = "Paperback storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a page of the catalog
    Browse {
        /// 1-indexed page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Books per page
        #[arg(short, long, default_value_t = 12)]
        limit: u32,
    },
    /// Show one book by id
    Show {
        /// Book id
        id: String,
    },
    /// Search the catalog
    Search {
        /// Free-text query matched against title and author
        query: String,

        /// Keep only this category
        #[arg(long)]
        category: Option<String>,

        /// Inclusive lower price bound
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Inclusive upper price bound
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Keep only books rated at least this highly
        #[arg(long)]
        rating: Option<f32>,

        /// Keep only books in stock
        #[arg(long)]
        in_stock: bool,

        /// Sort order: relevance, price, rating, or newest
        #[arg(long, default_value = "relevance")]
        sort: String,
    },
    /// Validate a coupon code
    Coupon {
        /// Coupon code
        code: String,

        /// User the coupon would apply to
        #[arg(long, default_value = "guest")]
        user: String,
    },
    /// Track a shipment
    Track {
        /// Tracking number
        tracking_number: String,
    },
    /// Show a user's order history
    Orders {
        /// User id
        user_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let shop = commands::storefront()?;

    match cli.command {
        Commands::Browse { page, limit } => commands::catalog::browse(&shop, page, limit).await,
        Commands::Show { id } => commands::catalog::show(&shop, &id).await,
        Commands::Search {
            query,
            category,
            min_price,
            max_price,
            rating,
            in_stock,
            sort,
        } => {
            let options = commands::catalog::SearchOptions {
                category,
                min_price,
                max_price,
                rating,
                in_stock,
                sort,
            };
            commands::catalog::search(&shop, &query, options).await
        }
        Commands::Coupon { code, user } => commands::shop::coupon(&shop, &code, &user).await,
        Commands::Track { tracking_number } => commands::shop::track(&shop, &tracking_number).await,
        Commands::Orders { user_id } => commands::shop::orders(&shop, &user_id).await,
    }
}
