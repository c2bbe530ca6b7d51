//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and admin flag. User tokens
//! expire after 24 hours; admin tokens after one day.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cartify_core::UserId;

/// Lifetime of a regular user token.
pub const USER_TOKEN_TTL_HOURS: i64 = 24;

/// Lifetime of an admin token (one day).
pub const ADMIN_TOKEN_TTL_HOURS: i64 = 24;

/// Token failures.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is expired.
    #[error("token expired")]
    Expired,
    /// The token is malformed or its signature does not verify.
    #[error("invalid token")]
    Invalid,
    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims carried by a bearer token.
///
/// The built-in admin token has no `userId`; regular tokens always do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    pub exp: i64,
}

/// Issue a signed bearer token.
///
/// # Errors
///
/// Returns `TokenError::Signing` if encoding fails.
pub fn issue(
    secret: &SecretString,
    user_id: Option<&UserId>,
    is_admin: bool,
    ttl_hours: i64,
) -> Result<String, TokenError> {
    let claims = Claims {
        user_id: user_id.map(|id| id.as_str().to_owned()),
        is_admin,
        exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify a bearer token and return its claims.
///
/// # Errors
///
/// Returns `TokenError::Expired` for expired tokens and `TokenError::Invalid`
/// for anything else that fails validation.
pub fn verify(secret: &SecretString, token: &str) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
