/// Playlist operations on behalf of an identified caller
use crate::error::Result;
use cinelist_core::{
    CinelistError, ItemDraft, Playlist, PlaylistDraft, PlaylistId, PlaylistStore, Username,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PlaylistService {
    store: Arc<dyn PlaylistStore>,
}

/// Every operation needs a caller; checked before the store is touched
fn require_caller(caller: &Username) -> Result<()> {
    if caller.as_str().trim().is_empty() {
        return Err(CinelistError::Unauthenticated.into());
    }
    Ok(())
}

impl PlaylistService {
    pub fn new(store: Arc<dyn PlaylistStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller: &Username) -> Result<Vec<Playlist>> {
        require_caller(caller)?;
        Ok(self.store.list_playlists(caller).await?)
    }

    pub async fn get(&self, caller: &Username, id: &PlaylistId) -> Result<Playlist> {
        require_caller(caller)?;
        let playlist = self
            .store
            .get_playlist(caller, id)
            .await?
            .ok_or_else(|| CinelistError::PlaylistNotFound(id.clone()))?;
        Ok(playlist)
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn create(&self, caller: &Username, draft: PlaylistDraft) -> Result<Playlist> {
        require_caller(caller)?;
        let fields = draft.validate()?;
        let playlist = self.store.create_playlist(caller, fields).await?;
        tracing::debug!(playlist_id = %playlist.id, "playlist created");
        Ok(playlist)
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn update(
        &self,
        caller: &Username,
        id: &PlaylistId,
        draft: PlaylistDraft,
    ) -> Result<Playlist> {
        require_caller(caller)?;
        let fields = draft.validate()?;
        Ok(self.store.update_playlist(caller, id, fields).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, caller: &Username, id: &PlaylistId) -> Result<()> {
        require_caller(caller)?;
        self.store.delete_playlist(caller, id).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn add_item(
        &self,
        caller: &Username,
        id: &PlaylistId,
        draft: ItemDraft,
    ) -> Result<Playlist> {
        require_caller(caller)?;
        let item = draft.validate()?;
        Ok(self.store.add_item(caller, id, item).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_item(
        &self,
        caller: &Username,
        id: &PlaylistId,
        media_id: &str,
    ) -> Result<Playlist> {
        require_caller(caller)?;
        Ok(self.store.remove_item(caller, id, media_id).await?)
    }
}
