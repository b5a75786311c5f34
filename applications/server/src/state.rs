/// Shared application state
use crate::services::{AccountService, AuthService, PlaylistService};
use cinelist_core::{PlaylistStore, UserStore};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub playlists: Arc<PlaylistService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Build the services over a single store handle
    pub fn new<S>(store: Arc<S>, auth_service: Arc<AuthService>) -> Self
    where
        S: UserStore + PlaylistStore + 'static,
    {
        let user_store: Arc<dyn UserStore> = store.clone();
        let playlist_store: Arc<dyn PlaylistStore> = store;

        Self {
            accounts: Arc::new(AccountService::new(user_store, Arc::clone(&auth_service))),
            playlists: Arc::new(PlaylistService::new(playlist_store)),
            auth_service,
        }
    }
}
