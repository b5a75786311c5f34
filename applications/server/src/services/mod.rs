/// Server services
pub mod accounts;
pub mod auth;
pub mod playlists;

pub use accounts::{AccountService, LoginOutcome};
pub use auth::AuthService;
pub use playlists::PlaylistService;
