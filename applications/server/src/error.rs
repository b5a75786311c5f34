/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cinelist_core::CinelistError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("{0}")]
    Core(#[from] CinelistError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<cinelist_storage::StorageError> for ServerError {
    fn from(err: cinelist_storage::StorageError) -> Self {
        ServerError::Core(err.into())
    }
}

const SERVER_ERROR: &str = "Server error";

fn core_status(err: &CinelistError) -> (StatusCode, String) {
    match err {
        CinelistError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        CinelistError::AlreadyExists(_) => {
            (StatusCode::BAD_REQUEST, "Username already exists".to_string())
        }
        CinelistError::UserNotFound(_) => (StatusCode::BAD_REQUEST, "User not found".to_string()),
        CinelistError::InvalidCredentials => {
            (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
        }
        CinelistError::DuplicateItem { .. } => {
            (StatusCode::BAD_REQUEST, "Item already in playlist".to_string())
        }
        CinelistError::Unauthenticated => {
            (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
        }
        CinelistError::PlaylistNotFound(_) => {
            (StatusCode::NOT_FOUND, "Playlist not found".to_string())
        }
        CinelistError::Storage(_) | CinelistError::Database(_) => {
            tracing::error!("Storage error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
        }
    }
}

impl ServerError {
    /// Status code and client-facing message; internal details are logged here
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ServerError::Core(e) => core_status(e),
            ServerError::Jwt(e) => {
                tracing::warn!("Token verification failed: {}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
            ServerError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
            ServerError::Bcrypt(e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}
