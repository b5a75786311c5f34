//! User domain type
use crate::error::{CinelistError, Result};
use crate::types::Username;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique account name
    pub username: Username,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Stored login material for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account the hash belongs to
    pub username: Username,

    /// bcrypt hash of the password; the plaintext is never stored
    pub password_hash: String,
}

/// Check a username presented at signup.
///
/// The value is kept exactly as given; it is the identity later presented on
/// every playlist request, so it must survive the trip through an HTTP header:
/// header parsers drop surrounding whitespace and refuse control characters.
pub fn validate_username(raw: &str) -> Result<Username> {
    if raw.trim().is_empty() {
        return Err(CinelistError::validation("Username is required"));
    }
    if raw.trim() != raw {
        return Err(CinelistError::validation(
            "Username must not start or end with whitespace",
        ));
    }
    if raw.chars().any(char::is_control) {
        return Err(CinelistError::validation(
            "Username must not contain control characters",
        ));
    }
    Ok(Username::new(raw))
}

/// Check a password presented at signup.
pub fn validate_password(raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(CinelistError::validation("Password is required"));
    }
    Ok(())
}
