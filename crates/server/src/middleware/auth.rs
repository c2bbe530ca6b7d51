//! Bearer token extractors for route handlers.
//!
//! Tokens arrive as `Authorization: Bearer <jwt>` and are verified against
//! the configured signing secret. Rejection bodies keep the legacy wire
//! messages.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use cartify_core::UserId;

use crate::services::token;
use crate::state::AppState;

/// Extractor that requires a user token and yields the caller's id.
///
/// # Example
///
/// ```rust,ignore
/// async fn get_cart(
///     RequireUser(user_id): RequireUser,
///     State(state): State<AppState>,
/// ) -> Result<Json<CartResponse>> { ... }
/// ```
pub struct RequireUser(pub UserId);

/// Extractor that requires a token with the admin flag set.
pub struct RequireAdmin;

/// Rejection returned when a bearer token is missing or unusable.
pub enum AuthRejection {
    /// No `Authorization: Bearer` header.
    MissingToken,
    /// Token failed verification, expired, or lacks a user id.
    InvalidToken,
    /// Token is valid but not an admin token.
    NotAdmin,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "No token, authorization denied",
            ),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Token is not valid"),
            Self::NotAdmin => (StatusCode::FORBIDDEN, "Admin access required"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;

        let user_id = claims.user_id.ok_or(AuthRejection::InvalidToken)?;

        Ok(Self(UserId::new(user_id)))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;

        if !claims.is_admin {
            return Err(AuthRejection::NotAdmin);
        }

        Ok(Self)
    }
}

/// Pull the bearer token off the request and verify it.
fn verify_bearer(parts: &Parts, state: &AppState) -> Result<token::Claims, AuthRejection> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthRejection::MissingToken)?;

    let raw = strip_bearer(header).ok_or(AuthRejection::MissingToken)?;

    token::verify(&state.config().jwt_secret, raw).map_err(|_| AuthRejection::InvalidToken)
}

/// Extract the token from a `Bearer <token>` header value.
fn strip_bearer(header: &str) -> Option<&str> {
    let rest = header.strip_prefix("Bearer ")?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bearer() {
        assert_eq!(strip_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(strip_bearer("Bearer   spaced  "), Some("spaced"));
    }

    #[test]
    fn test_strip_bearer_rejects_other_schemes() {
        assert_eq!(strip_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(strip_bearer("bearer lowercase-scheme"), None);
        assert_eq!(strip_bearer("Bearer "), None);
        assert_eq!(strip_bearer(""), None);
    }
}
