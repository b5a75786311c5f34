//! Storage traits implemented by the persistence layer
//!
//! Every playlist method takes the owning username and must filter by it, so a
//! playlist owned by someone else behaves exactly like one that does not exist.

use crate::error::Result;
use crate::types::{Credentials, NewItem, Playlist, PlaylistFields, PlaylistId, User, Username};
use async_trait::async_trait;

/// Persistence for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user.
    ///
    /// Fails with `CinelistError::AlreadyExists` if the username is taken.
    /// The check and the insert must be a single atomic write.
    async fn create_user(&self, username: &Username, password_hash: &str) -> Result<User>;

    /// Look up the stored hash for an exact username
    async fn find_credentials(&self, username: &Username) -> Result<Option<Credentials>>;

    /// All users ordered by username
    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Persistence for playlists and their embedded items
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// All playlists owned by `owner`, most recently updated first
    async fn list_playlists(&self, owner: &Username) -> Result<Vec<Playlist>>;

    /// Ownership-scoped lookup
    async fn get_playlist(&self, owner: &Username, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Create an empty playlist; `created_at` and `updated_at` are both now
    async fn create_playlist(&self, owner: &Username, fields: PlaylistFields) -> Result<Playlist>;

    /// Replace name and description and stamp `updated_at`.
    ///
    /// Fails with `CinelistError::PlaylistNotFound` when not owned.
    async fn update_playlist(
        &self,
        owner: &Username,
        id: &PlaylistId,
        fields: PlaylistFields,
    ) -> Result<Playlist>;

    /// Remove the playlist and all its items.
    ///
    /// Fails with `CinelistError::PlaylistNotFound` when not owned.
    async fn delete_playlist(&self, owner: &Username, id: &PlaylistId) -> Result<()>;

    /// Append an item and stamp `updated_at`.
    ///
    /// Fails with `CinelistError::DuplicateItem` (leaving the playlist
    /// untouched) if the media id is already present. Concurrent additions of
    /// the same media id must not both succeed.
    async fn add_item(&self, owner: &Username, id: &PlaylistId, item: NewItem) -> Result<Playlist>;

    /// Remove every item with `media_id` and stamp `updated_at`, even when
    /// nothing matched.
    async fn remove_item(
        &self,
        owner: &Username,
        id: &PlaylistId,
        media_id: &str,
    ) -> Result<Playlist>;
}
