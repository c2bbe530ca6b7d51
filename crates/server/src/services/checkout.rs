//! Atomic, idempotent checkout.
//!
//! The whole checkout runs inside one database transaction: the cart is
//! revalidated against live product rows, stock is decremented, the order is
//! recorded, and the cart is cleared. Either every step commits or none do.
//!
//! Replays are handled through an idempotency key: each key commits at most
//! one order, and retrying a committed key returns the original order without
//! touching stock again.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use uuid::Uuid;

use cartify_core::{CartLine, OrderId, ProductId, UserId, cart_total};

use crate::db::RepositoryError;
use crate::models::order::{Order, OrderItem};

/// Checkout failures.
///
/// Every variant except `Repository` leaves the database untouched: the
/// transaction rolls back on the first problem found.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user row no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// The cart is empty; there is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references a product that no longer exists.
    #[error("product with id {0} not found")]
    UnknownProduct(ProductId),

    /// A cart line references a product that was deactivated.
    #[error("product {0} is no longer available")]
    ProductUnavailable(String),

    /// Live stock is below the requested quantity.
    #[error("insufficient quantity for product {0}")]
    InsufficientStock(String),

    /// The live price differs from the snapshot taken at add-to-cart time.
    #[error("price of {title} changed from {snapshot} to {current}")]
    PriceChanged {
        title: String,
        snapshot: Decimal,
        current: Decimal,
    },

    /// Two requests raced on the same idempotency key.
    #[error("checkout already in progress for this key")]
    KeyContention,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Result of a checkout call.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub order: Order,
    /// True when the idempotency key had already committed and the stored
    /// order was returned instead of placing a new one.
    pub replayed: bool,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

/// Locked product fields read inside the checkout transaction.
#[derive(sqlx::FromRow)]
struct LockedProduct {
    title: String,
    price: Decimal,
    quantity: i32,
    is_active: bool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for the user's current cart.
    ///
    /// `payment_id` is the opaque reference returned by the payment provider;
    /// it is logged for correlation but not stored.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`]. On any error the transaction rolls back and no
    /// stock, order, or cart state changes.
    pub async fn place_order(
        &self,
        user_id: &UserId,
        idempotency_key: Uuid,
        payment_id: &str,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Replay check first so retries never re-lock product rows.
        if let Some(order) = self.find_committed(&mut tx, user_id, idempotency_key).await? {
            tx.commit().await?;
            tracing::info!(
                user_id = %user_id,
                order_id = %order.order_id,
                %idempotency_key,
                "checkout replayed"
            );
            return Ok(CheckoutOutcome {
                order,
                replayed: true,
            });
        }

        let (user_name, mut cart) = lock_user_cart(&mut tx, user_id).await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Lock product rows in id order so concurrent checkouts over
        // overlapping carts cannot deadlock.
        cart.sort_by_key(|line| line.product_id.as_i64());

        for line in &cart {
            let product = lock_product(&mut tx, line.product_id).await?;

            if !product.is_active {
                return Err(CheckoutError::ProductUnavailable(product.title));
            }
            if product.price != line.price {
                return Err(CheckoutError::PriceChanged {
                    title: product.title,
                    snapshot: line.price,
                    current: product.price,
                });
            }
            if product.quantity < line.quantity {
                return Err(CheckoutError::InsufficientStock(product.title));
            }

            sqlx::query("UPDATE products SET quantity = quantity - $2 WHERE id = $1")
                .bind(line.product_id.as_i64())
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
        }

        let order = Order {
            order_id: OrderId::mint(),
            user_id: user_id.clone(),
            user_name,
            items: cart
                .iter()
                .map(|line| OrderItem {
                    name: line.title.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            bill_amount: cart_total(&cart),
            created_at: Utc::now(),
        };

        insert_order(&mut tx, &order).await?;

        sqlx::query("UPDATE users SET cart = '[]'::jsonb WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO checkout_attempts (idempotency_key, user_id, order_id)
             VALUES ($1, $2, $3)",
        )
        .bind(idempotency_key)
        .bind(user_id.as_str())
        .bind(order.order_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return CheckoutError::KeyContention;
            }
            CheckoutError::from(e)
        })?;

        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            order_id = %order.order_id,
            %idempotency_key,
            payment_id,
            bill_amount = %order.bill_amount,
            "checkout committed"
        );

        Ok(CheckoutOutcome {
            order,
            replayed: false,
        })
    }

    /// Look up an order this user already committed under this idempotency
    /// key.
    ///
    /// The lookup is scoped to the caller: another user presenting the same
    /// key must never see the stored order. Their attempt falls through to a
    /// fresh checkout, which then fails the key's unique constraint and
    /// surfaces as [`CheckoutError::KeyContention`].
    async fn find_committed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: &UserId,
        idempotency_key: Uuid,
    ) -> Result<Option<Order>, CheckoutError> {
        let order_id: Option<String> = sqlx::query_scalar(
            "SELECT order_id FROM checkout_attempts
             WHERE idempotency_key = $1 AND user_id = $2",
        )
        .bind(idempotency_key)
        .bind(user_id.as_str())
        .fetch_optional(&mut **tx)
        .await?;

        let Some(order_id) = order_id else {
            return Ok(None);
        };

        let order = fetch_order(tx, &order_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "checkout attempt {idempotency_key} references missing order {order_id}"
            ))
        })?;

        Ok(Some(order))
    }
}

/// Lock the user row and return their name and parsed cart.
async fn lock_user_cart(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &UserId,
) -> Result<(String, Vec<CartLine>), CheckoutError> {
    let row: Option<(String, serde_json::Value)> =
        sqlx::query_as("SELECT name, cart FROM users WHERE user_id = $1 FOR UPDATE")
            .bind(user_id.as_str())
            .fetch_optional(&mut **tx)
            .await?;

    let Some((name, cart)) = row else {
        return Err(CheckoutError::UserNotFound);
    };

    let cart: Vec<CartLine> = serde_json::from_value(cart).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid cart data in database: {e}"))
    })?;

    Ok((name, cart))
}

/// Lock one product row for the duration of the transaction.
async fn lock_product(
    tx: &mut Transaction<'_, Postgres>,
    id: ProductId,
) -> Result<LockedProduct, CheckoutError> {
    let row: Option<LockedProduct> = sqlx::query_as(
        "SELECT title, price, quantity, is_active FROM products WHERE id = $1 FOR UPDATE",
    )
    .bind(id.as_i64())
    .fetch_optional(&mut **tx)
    .await?;

    row.ok_or(CheckoutError::UnknownProduct(id))
}

async fn insert_order(
    tx: &mut Transaction<'_, Postgres>,
    order: &Order,
) -> Result<(), CheckoutError> {
    let items = serde_json::to_value(&order.items).map_err(|e| {
        RepositoryError::DataCorruption(format!("failed to serialize order items: {e}"))
    })?;

    sqlx::query(
        "INSERT INTO orders (order_id, user_id, user_name, items, bill_amount, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(order.order_id.as_str())
    .bind(order.user_id.as_str())
    .bind(&order.user_name)
    .bind(items)
    .bind(order.bill_amount)
    .bind(order.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn fetch_order(
    tx: &mut Transaction<'_, Postgres>,
    order_id: &str,
) -> Result<Option<Order>, CheckoutError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        order_id: String,
        user_id: String,
        user_name: String,
        items: serde_json::Value,
        bill_amount: Decimal,
        created_at: chrono::DateTime<Utc>,
    }

    let row: Option<Row> = sqlx::query_as(
        "SELECT order_id, user_id, user_name, items, bill_amount, created_at
         FROM orders WHERE order_id = $1",
    )
    .bind(order_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items: Vec<OrderItem> = serde_json::from_value(row.items).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid order items in database: {e}"))
    })?;

    Ok(Some(Order {
        order_id: OrderId::new(row.order_id),
        user_id: UserId::new(row.user_id),
        user_name: row.user_name,
        items,
        bill_amount: row.bill_amount,
        created_at: row.created_at,
    }))
}
