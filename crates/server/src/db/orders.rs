//! Order repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use cartify_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem};

/// Database row shape for `orders`.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: String,
    user_id: String,
    user_name: String,
    items: serde_json::Value,
    bill_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> = serde_json::from_value(row.items).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order items in database: {e}"))
        })?;

        Ok(Self {
            order_id: OrderId::new(row.order_id),
            user_id: UserId::new(row.user_id),
            user_name: row.user_name,
            items,
            bill_amount: row.bill_amount,
            created_at: row.created_at,
        })
    }
}

const ORDER_COLUMNS: &str = "order_id, user_id, user_name, items, bill_amount, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, order: &Order) -> Result<(), RepositoryError> {
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
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order id already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Fetch all orders for a user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored items are invalid.
    pub async fn for_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Fetch a single order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored items are invalid.
    pub async fn get(&self, order_id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"))
                .bind(order_id.as_str())
                .fetch_optional(self.pool)
                .await?;

        row.map(Order::try_from).transpose()
    }
}
