//! Playlist domain types
use crate::error::{CinelistError, Result};
use crate::types::{PlaylistId, Username};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of media an item points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A feature film
    Movie,
    /// A TV show or episode
    Tv,
}

impl MediaType {
    /// Convert media type to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl FromStr for MediaType {
    type Err = CinelistError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(CinelistError::validation(format!(
                "Invalid mediaType '{}': expected 'movie' or 'tv'",
                other
            ))),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media reference embedded in a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    /// External media reference, unique within its playlist
    pub media_id: String,

    /// Display title
    pub title: String,

    /// Optional poster image reference
    pub poster: Option<String>,

    /// Movie or TV
    pub media_type: MediaType,

    /// When the item was added
    pub added_at: DateTime<Utc>,
}

/// Playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name, trimmed and never empty
    pub name: String,

    /// Optional description, trimmed
    pub description: Option<String>,

    /// Owner; fixed at creation
    pub username: Username,

    /// Items in insertion order
    pub items: Vec<PlaylistItem>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Refreshed by every mutation
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Whether an item with this media id is present
    pub fn contains(&self, media_id: &str) -> bool {
        self.items.iter().any(|item| item.media_id == media_id)
    }
}

/// Unvalidated playlist fields as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistDraft {
    /// Requested name
    pub name: Option<String>,
    /// Requested description
    pub description: Option<String>,
}

/// Validated playlist fields, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistFields {
    /// Trimmed, non-empty name
    pub name: String,
    /// Trimmed description; blank becomes `None`
    pub description: Option<String>,
}

impl PlaylistDraft {
    /// Validate and normalize the draft.
    pub fn validate(self) -> Result<PlaylistFields> {
        let name = required_trimmed(self.name, "name")?;
        Ok(PlaylistFields {
            name,
            description: optional_trimmed(self.description),
        })
    }
}

/// Unvalidated item as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    /// Requested media id
    pub media_id: Option<String>,
    /// Requested title
    pub title: Option<String>,
    /// Requested poster
    pub poster: Option<String>,
    /// Requested media type, `movie` or `tv`
    pub media_type: Option<String>,
}

/// Validated item, ready to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Non-blank media id, kept as given
    pub media_id: String,
    /// Trimmed, non-empty title
    pub title: String,
    /// Trimmed poster; blank becomes `None`
    pub poster: Option<String>,
    /// Parsed media type
    pub media_type: MediaType,
}

impl ItemDraft {
    /// Validate and normalize the draft.
    pub fn validate(self) -> Result<NewItem> {
        let media_id = match self.media_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(CinelistError::validation("mediaId is required")),
        };
        let title = required_trimmed(self.title, "title")?;
        let media_type = self
            .media_type
            .ok_or_else(|| CinelistError::validation("mediaType is required"))?
            .parse::<MediaType>()?;

        Ok(NewItem {
            media_id,
            title,
            poster: optional_trimmed(self.poster),
            media_type,
        })
    }
}

fn required_trimmed(value: Option<String>, field: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CinelistError::validation(format!("{} is required", field))),
    }
}

fn optional_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
