//! Cinelist Server Library
//!
//! Account and movie/TV playlist backend: signup, login, and per-user
//! playlist management over HTTP.
//!
//! This library exposes the router and its components so the binary and the
//! integration tests build the exact same application.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

// Re-export commonly used types for convenience
pub use config::{IdentityMode, ServerConfig};
pub use error::{Result, ServerError};
pub use services::{AccountService, AuthService, PlaylistService};
pub use state::AppState;

/// Build the HTTP application
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no identity required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/signup", post(api::auth::signup))
        .route("/login", post(api::auth::login));

    // Routes scoped to the caller
    let protected_routes = Router::new()
        .route(
            "/playlists",
            get(api::playlists::list_playlists).post(api::playlists::create_playlist),
        )
        .route(
            "/playlists/:id",
            get(api::playlists::get_playlist)
                .put(api::playlists::update_playlist)
                .delete(api::playlists::delete_playlist),
        )
        .route("/playlists/:id/items", post(api::playlists::add_item))
        .route(
            "/playlists/:id/items/:media_id",
            delete(api::playlists::remove_item),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
