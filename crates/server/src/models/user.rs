//! Account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cartify_core::{CartLine, Email, UserId};

/// A registered account.
///
/// The cart is embedded in the user record as an array of line snapshots;
/// there is no separate cart entity.
#[derive(Debug, Clone)]
pub struct User {
    /// Timestamp-derived unique id.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address (stored lowercased).
    pub email: Email,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Embedded cart lines.
    pub cart: Vec<CartLine>,
    /// Whether this account may use admin endpoints.
    pub is_admin: bool,
    /// Soft-delete flag.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The subset of account fields returned with auth responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: UserId,
    pub name: String,
    pub email: Email,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Account view for the admin listing: everything except the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub user_id: UserId,
    pub name: String,
    pub email: Email,
    pub cart: Vec<CartLine>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for AdminUserView {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            cart: user.cart,
            is_admin: user.is_admin,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            user_id: UserId::new("1700000000000"),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            cart: Vec::new(),
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_user_omits_password() {
        let json = serde_json::to_value(PublicUser::from(&user())).unwrap();
        assert_eq!(json.get("userId").unwrap(), "1700000000000");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_admin_view_omits_password() {
        let json = serde_json::to_value(AdminUserView::from(user())).unwrap();
        assert!(json.get("isAdmin").is_some());
        assert!(json.get("cart").is_some());
        assert!(json.get("passwordHash").is_none());
    }
}
