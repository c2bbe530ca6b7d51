//! Database operations for the Cartify `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Accounts with the embedded `cart` JSONB array
//! - `products` - Catalog with stock quantities
//! - `orders` - Immutable order records
//! - `checkout_attempts` - Idempotency ledger for atomic checkout
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p cartify-cli -- migrate
//! ```
//!
//! All queries use the runtime-checked sqlx APIs so the workspace builds
//! without a database connection.

pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors produced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced row does not exist.
    #[error("not found")]
    NotFound,

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be decoded into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
