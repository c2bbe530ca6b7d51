//! Product repository for catalog database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use cartify_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductPatch};

/// Database row shape for `products`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    title: String,
    description: String,
    image: String,
    price: Decimal,
    quantity: i32,
    is_active: bool,
    rating: Decimal,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            description: row.description,
            image: row.image,
            price: row.price,
            quantity: row.quantity,
            is_active: row.is_active,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, title, description, image, price, quantity, is_active, rating, created_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one page of products in insertion (id) order, plus the total
    /// product count.
    ///
    /// No `is_active` filtering is applied; callers see inactive products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok((rows.into_iter().map(Product::from).collect(), total))
    }

    /// Fetch every product (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetch a product by its public id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a new product. The id is assigned by the database sequence.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (title, description, image, price, quantity, is_active, rating)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.image)
        .bind(new.price)
        .bind(new.quantity)
        .bind(new.is_active)
        .bind(new.rating)
        .fetch_one(self.pool)
        .await?;

        Ok(Product::from(row))
    }

    /// Apply a partial update, leaving absent fields untouched.
    ///
    /// Last write wins; there is no optimistic concurrency token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET
                 title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 image = COALESCE($4, image),
                 price = COALESCE($5, price),
                 quantity = COALESCE($6, quantity),
                 is_active = COALESCE($7, is_active),
                 rating = COALESCE($8, rating)
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image.as_deref())
        .bind(patch.price)
        .bind(patch.quantity)
        .bind(patch.is_active)
        .bind(patch.rating)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Delete a product, returning the deleted row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Subtract `quantity` from a product's stock.
    ///
    /// The caller performs the insufficient-stock pre-check; the `quantity >=`
    /// guard here only prevents the row from going negative under a race.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated (missing
    /// product, or stock dropped below the requested amount since the check).
    pub async fn subtract_quantity(
        &self,
        id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE products SET quantity = quantity - $2 WHERE id = $1 AND quantity >= $2")
                .bind(id.as_i64())
                .bind(quantity)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
