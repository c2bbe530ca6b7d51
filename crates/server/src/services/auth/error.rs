//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] cartify_core::EmailError),

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// No account matches the given email.
    #[error("unknown email")]
    UnknownEmail,

    /// The password does not match the stored hash.
    #[error("wrong password")]
    WrongPassword,

    /// User not found (change-password on a missing account).
    #[error("user not found")]
    UserNotFound,

    /// A required field was empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Token signing failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
