//! User repository for account and embedded-cart database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cartify_core::{CartLine, Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

/// Database row shape for `users`.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: String,
    name: String,
    email: String,
    password_hash: String,
    cart: serde_json::Value,
    is_admin: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let cart: Vec<CartLine> = serde_json::from_value(row.cart).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cart data in database: {e}"))
        })?;

        Ok(Self {
            user_id: UserId::new(row.user_id),
            name: row.name,
            email,
            password_hash: row.password_hash,
            cart,
            is_admin: row.is_admin,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str =
    "user_id, name, email, password_hash, cart, is_admin, is_active, created_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let cart = serde_json::to_value(&user.cart).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize cart: {e}"))
        })?;

        sqlx::query(
            "INSERT INTO users (user_id, name, email, password_hash, cart, is_admin, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.user_id.as_str())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(cart)
        .bind(user.is_admin)
        .bind(user.is_active)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email.as_str())
                .fetch_optional(self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_user_id(&self, user_id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
                .bind(user_id.as_str())
                .fetch_optional(self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    /// Fetch every account (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Get a user's embedded cart, or `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the cart data is invalid.
    pub async fn get_cart(&self, user_id: &UserId) -> Result<Option<Vec<CartLine>>, RepositoryError> {
        let value: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT cart FROM users WHERE user_id = $1")
                .bind(user_id.as_str())
                .fetch_optional(self.pool)
                .await?;

        let Some(value) = value else {
            return Ok(None);
        };

        let cart: Vec<CartLine> = serde_json::from_value(value).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cart data in database: {e}"))
        })?;

        Ok(Some(cart))
    }

    /// Replace a user's embedded cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn save_cart(
        &self,
        user_id: &UserId,
        cart: &[CartLine],
    ) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(cart).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize cart: {e}"))
        })?;

        let result = sqlx::query("UPDATE users SET cart = $2 WHERE user_id = $1")
            .bind(user_id.as_str())
            .bind(value)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_password_hash(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE email = $1")
            .bind(email.as_str())
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
