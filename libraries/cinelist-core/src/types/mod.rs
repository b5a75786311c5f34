//! Domain types for Cinelist

mod ids;
mod playlist;
mod user;

pub use ids::{PlaylistId, Username};
pub use playlist::{
    ItemDraft, MediaType, NewItem, Playlist, PlaylistDraft, PlaylistFields, PlaylistItem,
};
pub use user::{validate_password, validate_username, Credentials, User};
