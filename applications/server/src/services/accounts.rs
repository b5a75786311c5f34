/// Account registration and credential verification
use crate::{
    error::{Result, ServerError},
    services::AuthService,
};
use cinelist_core::{validate_password, validate_username, CinelistError, User, UserStore, Username};
use std::sync::Arc;

/// Outcome of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub username: Username,
    /// Present only when the server runs in token identity mode
    pub access_token: Option<String>,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    auth_service: Arc<AuthService>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, auth_service: Arc<AuthService>) -> Self {
        Self {
            store,
            auth_service,
        }
    }

    /// Create a user with a bcrypt-hashed password
    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = validate_username(username)?;
        validate_password(password)?;

        let password_hash = self.hash_blocking(password.to_string()).await?;
        let user = self.store.create_user(&username, &password_hash).await?;

        tracing::info!(username = %user.username, "user registered");
        Ok(user)
    }

    /// Check a username/password pair
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let username = validate_username(username)?;
        validate_password(password)?;

        let credentials = self
            .store
            .find_credentials(&username)
            .await?
            .ok_or_else(|| CinelistError::UserNotFound(username.clone()))?;

        let matches = self
            .verify_blocking(password.to_string(), credentials.password_hash)
            .await?;
        if !matches {
            tracing::debug!("password mismatch");
            return Err(CinelistError::InvalidCredentials.into());
        }

        let access_token = if self.auth_service.issues_tokens() {
            Some(self.auth_service.create_access_token(&credentials.username)?)
        } else {
            None
        };

        Ok(LoginOutcome {
            username: credentials.username,
            access_token,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.store.list_users().await?)
    }

    // bcrypt is CPU bound; keep it off the async workers
    async fn hash_blocking(&self, password: String) -> Result<String> {
        let auth = Arc::clone(&self.auth_service);
        tokio::task::spawn_blocking(move || auth.hash_password(&password))
            .await
            .map_err(|e| ServerError::Internal(format!("hashing task failed: {}", e)))?
    }

    async fn verify_blocking(&self, password: String, hash: String) -> Result<bool> {
        let auth = Arc::clone(&self.auth_service);
        tokio::task::spawn_blocking(move || auth.verify_password(&password, &hash))
            .await
            .map_err(|e| ServerError::Internal(format!("verification task failed: {}", e)))?
    }
}
