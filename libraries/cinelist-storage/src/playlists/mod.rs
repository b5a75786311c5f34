//! Playlists and their items
//!
//! Every query is scoped by the owning username. Mutations run in a single
//! transaction whose first statement stamps `updated_at` on the owned row, so
//! the ownership check, the change, and the timestamp commit together.

use chrono::{DateTime, Utc};
use cinelist_core::{
    error::Result, CinelistError, MediaType, NewItem, Playlist, PlaylistFields, PlaylistId,
    PlaylistItem, Username,
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;

fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        username: row.try_get("username")?,
        items: Vec::new(),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn item_from_row(row: &SqliteRow) -> Result<PlaylistItem> {
    let media_type: String = row.try_get("media_type")?;
    let media_type = media_type
        .parse::<MediaType>()
        .map_err(|e| CinelistError::storage(format!("corrupt playlist item: {}", e)))?;

    Ok(PlaylistItem {
        media_id: row.try_get("media_id")?,
        title: row.try_get("title")?,
        poster: row.try_get("poster")?,
        media_type,
        added_at: row.try_get::<DateTime<Utc>, _>("added_at")?,
    })
}

/// Load one owned playlist with its items
async fn fetch(
    conn: &mut SqliteConnection,
    owner: &Username,
    id: &PlaylistId,
) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, username, name, description, created_at, updated_at
        FROM playlists
        WHERE id = ? AND username = ?
        "#,
    )
    .bind(id)
    .bind(owner)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let mut playlist = playlist_from_row(&row)?;

    let item_rows = sqlx::query(
        r#"
        SELECT media_id, title, poster, media_type, added_at
        FROM playlist_items
        WHERE playlist_id = ?
        ORDER BY position
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    playlist.items = item_rows
        .iter()
        .map(item_from_row)
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(playlist))
}

/// Stamp `updated_at` on an owned playlist; fails when it is not owned
async fn touch(
    conn: &mut SqliteConnection,
    owner: &Username,
    id: &PlaylistId,
    now: DateTime<Utc>,
) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ? AND username = ?")
        .bind(now)
        .bind(id)
        .bind(owner)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CinelistError::PlaylistNotFound(id.clone()));
    }
    Ok(())
}

/// Get the user's playlists, most recently updated first
pub async fn get_user_playlists(pool: &SqlitePool, owner: &Username) -> Result<Vec<Playlist>> {
    // Read both tables from one snapshot
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        r#"
        SELECT id, username, name, description, created_at, updated_at
        FROM playlists
        WHERE username = ?
        ORDER BY updated_at DESC, rowid DESC
        "#,
    )
    .bind(owner)
    .fetch_all(&mut *tx)
    .await?;

    let item_rows = sqlx::query(
        r#"
        SELECT i.playlist_id, i.media_id, i.title, i.poster, i.media_type, i.added_at
        FROM playlist_items i
        INNER JOIN playlists p ON p.id = i.playlist_id
        WHERE p.username = ?
        ORDER BY i.playlist_id, i.position
        "#,
    )
    .bind(owner)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let mut items_by_playlist: HashMap<PlaylistId, Vec<PlaylistItem>> = HashMap::new();
    for row in &item_rows {
        let playlist_id: PlaylistId = row.try_get("playlist_id")?;
        items_by_playlist
            .entry(playlist_id)
            .or_default()
            .push(item_from_row(row)?);
    }

    rows.iter()
        .map(|row| -> Result<Playlist> {
            let mut playlist = playlist_from_row(row)?;
            playlist.items = items_by_playlist.remove(&playlist.id).unwrap_or_default();
            Ok(playlist)
        })
        .collect()
}

/// Get playlist by ID, only if owned by `owner`
pub async fn get_by_id(
    pool: &SqlitePool,
    owner: &Username,
    id: &PlaylistId,
) -> Result<Option<Playlist>> {
    let mut conn = pool.acquire().await?;
    fetch(&mut conn, owner, id).await
}

/// Create new empty playlist
pub async fn create(pool: &SqlitePool, owner: &Username, fields: PlaylistFields) -> Result<Playlist> {
    let id = PlaylistId::generate();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO playlists (id, username, name, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(owner)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Playlist {
        id,
        name: fields.name,
        description: fields.description,
        username: owner.clone(),
        items: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

/// Replace name and description
pub async fn update(
    pool: &SqlitePool,
    owner: &Username,
    id: &PlaylistId,
    fields: PlaylistFields,
) -> Result<Playlist> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, description = ?, updated_at = ?
        WHERE id = ? AND username = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(Utc::now())
    .bind(id)
    .bind(owner)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CinelistError::PlaylistNotFound(id.clone()));
    }

    let playlist = fetch(&mut tx, owner, id)
        .await?
        .ok_or_else(|| CinelistError::PlaylistNotFound(id.clone()))?;

    tx.commit().await?;
    Ok(playlist)
}

/// Delete playlist; items go with it through the cascading foreign key
pub async fn delete(pool: &SqlitePool, owner: &Username, id: &PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND username = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CinelistError::PlaylistNotFound(id.clone()));
    }
    Ok(())
}

/// Append an item to an owned playlist
///
/// The `(playlist_id, media_id)` primary key rejects duplicates inside the
/// same transaction that stamps `updated_at`; on conflict the transaction is
/// rolled back and the playlist is left as it was.
pub async fn add_item(
    pool: &SqlitePool,
    owner: &Username,
    id: &PlaylistId,
    item: NewItem,
) -> Result<Playlist> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    // Taking the write lock first serializes concurrent additions
    touch(&mut tx, owner, id, now).await?;

    let next_position: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM playlist_items WHERE playlist_id = ?",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    let result = sqlx::query(
        r#"
        INSERT INTO playlist_items (playlist_id, media_id, title, poster, media_type, position, added_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(playlist_id, media_id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(&item.media_id)
    .bind(&item.title)
    .bind(&item.poster)
    .bind(item.media_type.as_str())
    .bind(next_position)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(CinelistError::DuplicateItem {
            playlist_id: id.clone(),
            media_id: item.media_id,
        });
    }

    let playlist = fetch(&mut tx, owner, id)
        .await?
        .ok_or_else(|| CinelistError::PlaylistNotFound(id.clone()))?;

    tx.commit().await?;
    Ok(playlist)
}

/// Remove every item with `media_id`; a miss still stamps `updated_at`
pub async fn remove_item(
    pool: &SqlitePool,
    owner: &Username,
    id: &PlaylistId,
    media_id: &str,
) -> Result<Playlist> {
    let mut tx = pool.begin().await?;

    touch(&mut tx, owner, id, Utc::now()).await?;

    sqlx::query("DELETE FROM playlist_items WHERE playlist_id = ? AND media_id = ?")
        .bind(id)
        .bind(media_id)
        .execute(&mut *tx)
        .await?;

    let playlist = fetch(&mut tx, owner, id)
        .await?
        .ok_or_else(|| CinelistError::PlaylistNotFound(id.clone()))?;

    tx.commit().await?;
    Ok(playlist)
}
