//! The single error type handlers return.
//!
//! `AppError` turns into an HTTP response with a `{"message": ...}` body.
//! Server faults are reported to Sentry on the way out; client mistakes are
//! not. The messages for auth, cart and checkout failures are part of the
//! wire contract and must not be rephrased.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Top-level error for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// State conflict, such as price drift during checkout.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a server fault worth reporting to Sentry.
    fn is_server_fault(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::Token(_) | AuthError::PasswordHash
            ),
            Self::Checkout(err) => matches!(err, CheckoutError::Repository(_)),
            _ => false,
        }
    }

    /// HTTP status for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::Repository(_) | AuthError::Token(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                // The legacy contract reports every credential failure as 400.
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Checkout(err) => match err {
                CheckoutError::UserNotFound | CheckoutError::UnknownProduct(_) => {
                    StatusCode::NOT_FOUND
                }
                CheckoutError::EmptyCart
                | CheckoutError::ProductUnavailable(_)
                | CheckoutError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
                CheckoutError::PriceChanged { .. } | CheckoutError::KeyContention => {
                    StatusCode::CONFLICT
                }
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Client-facing message. Internal details never leak.
    fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Server error".to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) | AuthError::UnknownEmail => "Invalid Email".to_owned(),
                AuthError::UserAlreadyExists => "User already exists".to_owned(),
                AuthError::WrongPassword => "Password is wrong".to_owned(),
                AuthError::UserNotFound => "User not found".to_owned(),
                AuthError::MissingField(_) => "All fields are required".to_owned(),
                AuthError::Repository(_) | AuthError::Token(_) | AuthError::PasswordHash => {
                    "Server error".to_owned()
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::UserNotFound => "User not found".to_owned(),
                CheckoutError::EmptyCart => "Cart is empty".to_owned(),
                CheckoutError::UnknownProduct(id) => format!("Product with id {id} not found"),
                CheckoutError::ProductUnavailable(title) => {
                    format!("Product {title} is no longer available")
                }
                CheckoutError::InsufficientStock(title) => {
                    format!("Insufficient quantity for product {title}")
                }
                CheckoutError::PriceChanged { title, .. } => {
                    format!("Price of {title} changed, please review your cart")
                }
                CheckoutError::KeyContention => "Checkout already in progress".to_owned(),
                CheckoutError::Repository(_) => "Server error".to_owned(),
            },
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg)
            | Self::Conflict(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, %event_id, "request failed");
        }

        let body = json!({ "message": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_plain_variants_map_straight_to_status() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(get_status(err), expected);
        }
    }

    #[test]
    fn test_duplicate_email_maps_to_bad_request() {
        // The legacy wire contract reports duplicates as 400, not 409.
        let err = AppError::Auth(AuthError::UserAlreadyExists);
        assert_eq!(err.message(), "User already exists");
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_login_failures_keep_legacy_messages() {
        let err = AppError::Auth(AuthError::UnknownEmail);
        assert_eq!(err.message(), "Invalid Email");
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);

        let err = AppError::Auth(AuthError::WrongPassword);
        assert_eq!(err.message(), "Password is wrong");
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_checkout_error_mapping() {
        use cartify_core::ProductId;
        use rust_decimal::Decimal;

        let err = AppError::Checkout(CheckoutError::UnknownProduct(ProductId::new(7)));
        assert_eq!(err.message(), "Product with id 7 not found");
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);

        let err = AppError::Checkout(CheckoutError::InsufficientStock("Widget".to_string()));
        assert_eq!(err.message(), "Insufficient quantity for product Widget");
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);

        let err = AppError::Checkout(CheckoutError::PriceChanged {
            title: "Widget".to_string(),
            snapshot: Decimal::new(100, 2),
            current: Decimal::new(150, 2),
        });
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_details_do_not_leak() {
        let err = AppError::Internal("pool exhausted at 10.0.0.5".to_string());
        assert_eq!(err.message(), "Server error");
    }
}
