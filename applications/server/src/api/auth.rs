/// Signup and login API routes
use crate::{
    api::{ApiJson, MessageResponse},
    error::Result,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// POST /signup
pub async fn signup(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    app_state
        .accounts
        .register(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// POST /login
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>> {
    let outcome = app_state
        .accounts
        .authenticate(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    let token_type = outcome.access_token.as_ref().map(|_| "Bearer".to_string());

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        username: outcome.username.to_string(),
        access_token: outcome.access_token,
        token_type,
    }))
}
