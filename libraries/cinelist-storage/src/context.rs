use crate::{playlists, users};
use async_trait::async_trait;
use cinelist_core::{
    error::Result, Credentials, NewItem, Playlist, PlaylistFields, PlaylistId, PlaylistStore,
    User, UserStore, Username,
};
use sqlx::SqlitePool;

/// `SQLite`-backed implementation of the core storage traits
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, username: &Username, password_hash: &str) -> Result<User> {
        users::create(&self.pool, username, password_hash).await
    }

    async fn find_credentials(&self, username: &Username) -> Result<Option<Credentials>> {
        users::get_credentials(&self.pool, username).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }
}

#[async_trait]
impl PlaylistStore for SqliteStore {
    async fn list_playlists(&self, owner: &Username) -> Result<Vec<Playlist>> {
        playlists::get_user_playlists(&self.pool, owner).await
    }

    async fn get_playlist(&self, owner: &Username, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_by_id(&self.pool, owner, id).await
    }

    async fn create_playlist(&self, owner: &Username, fields: PlaylistFields) -> Result<Playlist> {
        playlists::create(&self.pool, owner, fields).await
    }

    async fn update_playlist(
        &self,
        owner: &Username,
        id: &PlaylistId,
        fields: PlaylistFields,
    ) -> Result<Playlist> {
        playlists::update(&self.pool, owner, id, fields).await
    }

    async fn delete_playlist(&self, owner: &Username, id: &PlaylistId) -> Result<()> {
        playlists::delete(&self.pool, owner, id).await
    }

    async fn add_item(&self, owner: &Username, id: &PlaylistId, item: NewItem) -> Result<Playlist> {
        playlists::add_item(&self.pool, owner, id, item).await
    }

    async fn remove_item(
        &self,
        owner: &Username,
        id: &PlaylistId,
        media_id: &str,
    ) -> Result<Playlist> {
        playlists::remove_item(&self.pool, owner, id, media_id).await
    }
}
