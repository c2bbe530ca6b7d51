//! Account registration, login, and credential management.
//!
//! Passwords are hashed with Argon2id. Successful logins mint an HS256
//! bearer token; the built-in admin (configured via environment) gets an
//! admin token without a backing account row.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use cartify_core::{Email, UserId};

use crate::config::ServerConfig;
use crate::db::users::UserRepository;
use crate::models::user::{PublicUser, User};
use crate::services::token::{self, ADMIN_TOKEN_TTL_HOURS, USER_TOKEN_TTL_HOURS};

pub mod error;

pub use error::AuthError;

/// Outcome of a successful login or registration.
#[derive(Debug)]
pub struct AuthSession {
    pub user: PublicUser,
    pub token: String,
    pub is_admin: bool,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    config: &'a ServerConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, config: &'a ServerConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            config,
        }
    }

    /// Register a new account and log it in.
    ///
    /// The user id is minted from the current timestamp; the cart starts
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if any field is empty,
    /// `AuthError::InvalidEmail` for a malformed email, and
    /// `AuthError::UserAlreadyExists` when the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = User {
            user_id: UserId::mint(),
            name: name.trim().to_owned(),
            email,
            password_hash,
            cart: Vec::new(),
            is_admin: false,
            is_active: true,
            created_at: chrono::Utc::now(),
        };

        self.users.create(&user).await.map_err(|e| match e {
            crate::db::RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        let token = token::issue(
            &self.config.jwt_secret,
            Some(&user.user_id),
            false,
            USER_TOKEN_TTL_HOURS,
        )?;

        Ok(AuthSession {
            user: PublicUser::from(&user),
            token,
            is_admin: false,
        })
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownEmail` if no account matches and
    /// `AuthError::WrongPassword` if the password does not verify.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Err(AuthError::UnknownEmail);
        };

        verify_password(password, &user.password_hash)?;

        let token = token::issue(
            &self.config.jwt_secret,
            Some(&user.user_id),
            user.is_admin,
            USER_TOKEN_TTL_HOURS,
        )?;

        Ok(AuthSession {
            is_admin: user.is_admin,
            user: PublicUser::from(&user),
            token,
        })
    }

    /// Log in through the admin endpoint.
    ///
    /// The configured built-in admin is checked first; any other email falls
    /// through to the regular account table, and the token carries that
    /// account's admin flag.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::login`].
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if let Some(admin) = &self.config.admin
            && admin.email == email.trim().to_lowercase()
        {
            if admin.password.expose_secret() != password {
                return Err(AuthError::WrongPassword);
            }

            let token = token::issue(&self.config.jwt_secret, None, true, ADMIN_TOKEN_TTL_HOURS)?;

            return Ok(AuthSession {
                user: PublicUser {
                    user_id: UserId::new("admin"),
                    name: "Admin".to_owned(),
                    email: Email::parse(&admin.email)?,
                },
                token,
                is_admin: true,
            });
        }

        self.login(email, password).await
    }

    /// Change an account's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account does not exist and
    /// `AuthError::WrongPassword` if the current password does not verify.
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::MissingField("newPassword"));
        }

        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Err(AuthError::UserNotFound);
        };

        verify_password(current_password, &user.password_hash)?;

        let new_hash = hash_password(new_password)?;
        self.users.set_password_hash(&email, &new_hash).await?;

        Ok(())
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::WrongPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::WrongPassword)
}
