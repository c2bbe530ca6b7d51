//! Newtype IDs for type-safe entity references.
//!
//! `ProductId` wraps the sequential numeric catalog id. `UserId` and
//! `OrderId` wrap the timestamp-derived string identifiers minted at
//! registration and order creation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Numeric catalog product id.
///
/// Assigned sequentially by the database when a product is created. The
/// public id is decoupled from any internal row identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Timestamp-derived user identifier (milliseconds since epoch as a string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Mint a new user id from the current timestamp.
    #[must_use]
    pub fn mint() -> Self {
        Self(Utc::now().timestamp_millis().to_string())
    }

    /// Wrap an existing id value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Timestamp-derived order identifier (`ORD` followed by milliseconds since
/// epoch).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Mint a new order id from the current timestamp.
    #[must_use]
    pub fn mint() -> Self {
        Self(format!("ORD{}", Utc::now().timestamp_millis()))
    }

    /// Wrap an existing id value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)

#[cfg(feature = "postgres")]
mod postgres_impls {
    use super::{OrderId, ProductId, UserId};

    macro_rules! delegate_sqlx {
        ($name:ident, $inner:ty) => {
            impl sqlx::Type<sqlx::Postgres> for $name {
                fn type_info() -> sqlx::postgres::PgTypeInfo {
                    <$inner as sqlx::Type<sqlx::Postgres>>::type_info()
                }

                fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                    <$inner as sqlx::Type<sqlx::Postgres>>::compatible(ty)
                }
            }

            impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
                fn decode(
                    value: sqlx::postgres::PgValueRef<'r>,
                ) -> Result<Self, sqlx::error::BoxDynError> {
                    let inner = <$inner as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                    Ok(Self(inner))
                }
            }

            impl sqlx::Encode<'_, sqlx::Postgres> for $name {
                fn encode_by_ref(
                    &self,
                    buf: &mut sqlx::postgres::PgArgumentBuffer,
                ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                    <$inner as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
                }
            }
        };
    }

    delegate_sqlx!(ProductId, i64);
    delegate_sqlx!(UserId, String);
    delegate_sqlx!(OrderId, String);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_roundtrip() {
        let id = ProductId::new(7);
        assert_eq!(id.as_i64(), 7);
        assert_eq!(i64::from(id), 7);
        assert_eq!(ProductId::from(7), id);
        assert_eq!(format!("{id}"), "7");
    }

    #[test]
    fn test_product_id_serde_transparent() {
        let id = ProductId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let parsed: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_user_id_mint_is_numeric_string() {
        let id = UserId::mint();
        assert!(id.as_str().parse::<i64>().is_ok());
    }

    #[test]
    fn test_order_id_mint_has_prefix() {
        let id = OrderId::mint();
        assert!(id.as_str().starts_with("ORD"));
        let rest = id.as_str().trim_start_matches("ORD");
        assert!(rest.parse::<i64>().is_ok());
    }

    #[test]
    fn test_string_id_serde_transparent() {
        let id = UserId::new("1700000000000");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1700000000000\"");
    }
}
