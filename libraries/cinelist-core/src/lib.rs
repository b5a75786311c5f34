//! Cinelist Core
//!
//! Storage-agnostic domain types, validation, traits, and error handling for
//! Cinelist.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Playlist`, `PlaylistItem`, `MediaType`
//! - **Validation**: explicit checks that run before any store access
//! - **Storage Traits**: `UserStore`, `PlaylistStore`
//! - **Error Handling**: Unified `CinelistError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cinelist_core::types::{ItemDraft, MediaType, PlaylistDraft};
//!
//! let fields = PlaylistDraft {
//!     name: Some("  Favorites ".to_string()),
//!     description: None,
//! }
//! .validate()
//! .unwrap();
//! assert_eq!(fields.name, "Favorites");
//!
//! let item = ItemDraft {
//!     media_id: Some("tt001".to_string()),
//!     title: Some("Movie A".to_string()),
//!     poster: None,
//!     media_type: Some("movie".to_string()),
//! }
//! .validate()
//! .unwrap();
//! assert_eq!(item.media_type, MediaType::Movie);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

pub use error::{CinelistError, Result};
pub use storage::{PlaylistStore, UserStore};

pub use types::{
    validate_password, validate_username, Credentials, ItemDraft, MediaType, NewItem, Playlist,
    PlaylistDraft, PlaylistFields, PlaylistId, PlaylistItem, User, Username,
};
