/// Playlists API routes
///
/// Every route runs behind the identity middleware and only ever sees the
/// caller's own playlists.
use crate::{
    api::{ApiJson, MessageResponse},
    error::Result,
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cinelist_core::{ItemDraft, Playlist, PlaylistDraft, PlaylistId};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<PlaylistRequest> for PlaylistDraft {
    fn from(req: PlaylistRequest) -> Self {
        PlaylistDraft {
            name: req.name,
            description: req.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(default)]
    pub media_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

impl From<AddItemRequest> for ItemDraft {
    fn from(req: AddItemRequest) -> Self {
        ItemDraft {
            media_id: req.media_id,
            title: req.title,
            poster: req.poster,
            media_type: req.media_type,
        }
    }
}

/// GET /playlists
/// Caller's playlists, most recently updated first
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state.playlists.list(auth.username()).await?;
    Ok(Json(playlists))
}

/// GET /playlists/:id
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Playlist>> {
    let playlist = app_state
        .playlists
        .get(auth.username(), &PlaylistId::new(id))
        .await?;
    Ok(Json(playlist))
}

/// POST /playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<PlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let playlist = app_state
        .playlists
        .create(auth.username(), req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

/// PUT /playlists/:id
/// Replace name and description
pub async fn update_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<PlaylistRequest>,
) -> Result<Json<Playlist>> {
    let playlist = app_state
        .playlists
        .update(auth.username(), &PlaylistId::new(id), req.into())
        .await?;
    Ok(Json(playlist))
}

/// DELETE /playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MessageResponse>> {
    app_state
        .playlists
        .delete(auth.username(), &PlaylistId::new(id))
        .await?;
    Ok(Json(MessageResponse::new("Playlist deleted")))
}

/// POST /playlists/:id/items
pub async fn add_item(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<AddItemRequest>,
) -> Result<Json<Playlist>> {
    let playlist = app_state
        .playlists
        .add_item(auth.username(), &PlaylistId::new(id), req.into())
        .await?;
    Ok(Json(playlist))
}

/// DELETE /playlists/:id/items/:media_id
/// Succeeds even when no item matched
pub async fn remove_item(
    Path((id, media_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Playlist>> {
    let playlist = app_state
        .playlists
        .remove_item(auth.username(), &PlaylistId::new(id), &media_id)
        .await?;
    Ok(Json(playlist))
}
