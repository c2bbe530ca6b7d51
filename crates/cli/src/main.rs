//! Cartify CLI - migrations, seeding, and a shopper client.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cartify-cli migrate
//!
//! # Seed the catalog with sample products
//! cartify-cli seed
//!
//! # Shop against a running server
//! cartify-cli shop register -n Ada -e ada@example.com -p secret
//! cartify-cli shop browse --page 1
//! cartify-cli shop add 3 --quantity 2
//! cartify-cli shop checkout
//! cartify-cli shop checkout --atomic
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog with sample products
//! - `shop` - Shopper client: auth, browsing, cart, checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod api;
mod checkout;
mod commands;
mod payment;
mod session;

#[derive(Parser)]
#[command(name = "cartify-cli")]
#[command(author, version, about = "Cartify CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with sample products
    Seed,
    /// Shopper client against a running server
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// Create an account and start a session
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log in and start a session
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// List a page of the catalog
    Browse {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: i64,

        /// Page size
        #[arg(long, default_value_t = 12)]
        limit: i64,
    },
    /// Show the current cart
    Cart,
    /// Add a product to the cart (catalog-add semantics: +1 per call,
    /// capped at 5 per line)
    Add {
        /// Product id
        product_id: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: i64,
    },
    /// Place an order for the current cart
    Checkout {
        /// Use the atomic server-side checkout instead of the legacy
        /// client-orchestrated sequence
        #[arg(long)]
        atomic: bool,
    },
    /// List past orders
    Orders,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Shop { action } => match action {
            ShopAction::Register {
                name,
                email,
                password,
            } => commands::shop::register(&name, &email, &password).await?,
            ShopAction::Login { email, password } => {
                commands::shop::login(&email, &password).await?;
            }
            ShopAction::Logout => commands::shop::logout()?,
            ShopAction::Browse { page, limit } => commands::shop::browse(page, limit).await?,
            ShopAction::Cart => commands::shop::cart().await?,
            ShopAction::Add { product_id } => commands::shop::add(product_id).await?,
            ShopAction::Remove { product_id } => commands::shop::remove(product_id).await?,
            ShopAction::Checkout { atomic } => commands::shop::checkout(atomic).await?,
            ShopAction::Orders => commands::shop::orders().await?,
        },
    }
    Ok(())
}
