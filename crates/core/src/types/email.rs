//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

// RFC 5321 path limit.
const MAX_LEN: usize = 254;

/// Ways an [`Email`] can fail to parse.
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email exceeds {MAX_LEN} characters")]
    TooLong,
    #[error("email needs a local part, an @ sign and a domain")]
    Malformed,
}

/// A structurally valid, lowercased email address.
///
/// Validation is deliberately shallow: non-empty local part, an @ sign, a
/// non-empty domain, and a length cap. Anything stricter rejects addresses
/// that mail servers happily deliver to. Input is trimmed and lowercased on
/// parse so lookups against the account store are case-insensitive.
///
/// ```
/// use cartify_core::Email;
///
/// let email = Email::parse(" Shopper@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "shopper@example.com");
///
/// assert!(Email::parse("not-an-address").is_err());
/// assert!(Email::parse("@nobody").is_err());
/// assert!(Email::parse("nowhere@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] when the trimmed input is empty, longer than
    /// 254 characters, or not of the form `local@domain`.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > MAX_LEN {
            return Err(EmailError::TooLong);
        }

        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_lowercase()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Stored as TEXT; values coming back from the database were validated on the
// way in, so decoding skips the parse.
#[cfg(feature = "postgres")]
mod pg {
    use super::Email;

    impl sqlx::Type<sqlx::Postgres> for Email {
        fn type_info() -> sqlx::postgres::PgTypeInfo {
            <String as sqlx::Type<sqlx::Postgres>>::type_info()
        }

        fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
            <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
        }
    }

    impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
        fn decode(
            value: sqlx::postgres::PgValueRef<'r>,
        ) -> Result<Self, sqlx::error::BoxDynError> {
            <String as sqlx::Decode<sqlx::Postgres>>::decode(value).map(Email)
        }
    }

    impl sqlx::Encode<'_, sqlx::Postgres> for Email {
        fn encode_by_ref(
            &self,
            buf: &mut sqlx::postgres::PgArgumentBuffer,
        ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
            <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
        }
    }
}
