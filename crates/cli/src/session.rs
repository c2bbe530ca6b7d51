//! On-disk shopper session.
//!
//! The session is an explicit value passed to the API client, not ambient
//! global state: commands load it, thread it through, and save it back.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the session file lives unless `CARTIFY_SESSION_FILE` overrides it.
const DEFAULT_SESSION_FILE: &str = ".cartify-session.json";

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt session file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not logged in (run `cartify-cli shop login` first)")]
    NotLoggedIn,
}

/// A stored shopper session.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

impl Session {
    /// Resolve the session file path.
    #[must_use]
    pub fn path() -> PathBuf {
        std::env::var("CARTIFY_SESSION_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from)
    }

    /// Load the stored session; a missing file is an empty session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for unreadable or corrupt session files.
    pub fn load() -> Result<Self, SessionError> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist the session to disk.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file cannot be written.
    pub fn save(&self) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::path(), raw)?;
        Ok(())
    }

    /// Delete the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be removed.
    pub fn clear() -> Result<(), SessionError> {
        let path = Self::path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// The bearer token, or an error telling the user to log in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` when no token is stored.
    pub fn require_token(&self) -> Result<&str, SessionError> {
        self.token.as_deref().ok_or(SessionError::NotLoggedIn)
    }

    /// The logged-in user's id, or an error telling the user to log in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` when no user id is stored.
    pub fn require_user_id(&self) -> Result<&str, SessionError> {
        self.user_id.as_deref().ok_or(SessionError::NotLoggedIn)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_requires_login() {
        let session = Session::default();
        assert!(matches!(
            session.require_token(),
            Err(SessionError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let session = Session {
            token: Some("abc.def.ghi".to_string()),
            user_id: Some("1700000000000".to_string()),
            user_name: Some("Ada".to_string()),
        };

        let raw = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.token.as_deref(), Some("abc.def.ghi"));
        assert_eq!(back.user_id.as_deref(), Some("1700000000000"));
    }
}
