//! Core error types for Cinelist
use crate::types::{PlaylistId, Username};
use thiserror::Error;

/// Result type alias using `CinelistError`
pub type Result<T> = std::result::Result<T, CinelistError>;

/// Core error type for Cinelist
#[derive(Error, Debug)]
pub enum CinelistError {
    /// A required field is missing or malformed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Signup collided with an existing username
    #[error("Username already exists: {0}")]
    AlreadyExists(Username),

    /// No user with this username
    #[error("User not found: {0}")]
    UserNotFound(Username),

    /// Playlist does not exist or is owned by someone else
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Password did not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No identity accompanied the request
    #[error("Authentication required")]
    Unauthenticated,

    /// The playlist already holds an item with this media id
    #[error("Item {media_id} already in playlist {playlist_id}")]
    DuplicateItem {
        /// Playlist that rejected the item
        playlist_id: PlaylistId,
        /// Media id that is already present
        media_id: String,
    },

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl CinelistError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// True for failures of the backing store rather than of the request
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Database(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for CinelistError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
