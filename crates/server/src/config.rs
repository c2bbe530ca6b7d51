//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARTIFY_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//! - `CARTIFY_JWT_SECRET` - Bearer token signing secret (min 32 chars)
//!
//! ## Optional
//! - `CARTIFY_HOST` - Bind address (default: 127.0.0.1)
//! - `CARTIFY_PORT` - Listen port (default: 3000)
//! - `CARTIFY_ADMIN_EMAIL` / `CARTIFY_ADMIN_PASSWORD` - Built-in admin
//!   credentials for `POST /api/admin/login`; when unset, admin login falls
//!   through to regular account lookup only
//! - `CARTIFY_CORS_ORIGIN` - Allowed CORS origin (default: any)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Substrings that mark a signing secret as a leftover placeholder
/// (matched case-insensitively).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret-key",
    "password",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Cartify server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer token signing secret
    pub jwt_secret: SecretString,
    /// Built-in admin credentials, if configured
    pub admin: Option<AdminCredentials>,
    /// Allowed CORS origin (any origin when unset)
    pub cors_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Built-in admin login credentials.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the environment, reading `.env` first if one
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or
    /// unparseable, or if the JWT secret looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let jwt_secret = SecretString::from(required("CARTIFY_JWT_SECRET")?);
        reject_weak_secret(&jwt_secret, "CARTIFY_JWT_SECRET")?;

        Ok(Self {
            database_url: database_url()?,
            host: parsed_or_default("CARTIFY_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parsed_or_default("CARTIFY_PORT", 3000)?,
            jwt_secret,
            admin: AdminCredentials::from_env()?,
            cors_origin: env::var("CARTIFY_CORS_ORIGIN").ok(),
            sentry_dsn: env::var("SENTRY_DSN").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminCredentials {
    /// Load the built-in admin credentials if both variables are set.
    ///
    /// Setting only one of the pair is treated as a configuration mistake.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let email = env::var("CARTIFY_ADMIN_EMAIL").ok();
        let password = env::var("CARTIFY_ADMIN_PASSWORD").ok();

        match (email, password) {
            (Some(email), Some(password)) => Ok(Some(Self {
                email: email.to_lowercase(),
                password: SecretString::from(password),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(
                "CARTIFY_ADMIN_PASSWORD".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(
                "CARTIFY_ADMIN_EMAIL".to_string(),
            )),
        }
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse `key` if set, otherwise use `default`.
fn parsed_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// `CARTIFY_DATABASE_URL`, or the generic `DATABASE_URL` that managed
/// Postgres providers export.
fn database_url() -> Result<SecretString, ConfigError> {
    env::var("CARTIFY_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar("CARTIFY_DATABASE_URL".to_string()))
}

/// Reject signing secrets that are too short or look like a template value.
fn reject_weak_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();

    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_JWT_SECRET_LENGTH} characters (got {})",
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    Ok(())
}
