/// Authentication service - password hashing and access tokens
use crate::{
    config::{AuthSettings, IdentityMode, MAX_JWT_EXPIRATION_HOURS},
    error::{Result, ServerError},
};
use chrono::{Duration, Utc};
use cinelist_core::Username;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    identity_mode: IdentityMode,
    bcrypt_cost: u32,
    secret: String,
    access_token_expiration: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (username)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

impl AuthService {
    pub fn new(
        identity_mode: IdentityMode,
        bcrypt_cost: u32,
        secret: String,
        access_expiration_hours: u64,
    ) -> Self {
        Self {
            identity_mode,
            bcrypt_cost,
            secret,
            // Clamped to keep chrono in range
            access_token_expiration: Duration::hours(
                access_expiration_hours.min(MAX_JWT_EXPIRATION_HOURS) as i64,
            ),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(
            settings.identity_mode,
            settings.bcrypt_cost,
            settings.jwt_secret.clone(),
            settings.jwt_expiration_hours,
        )
    }

    pub fn identity_mode(&self) -> IdentityMode {
        self.identity_mode
    }

    /// True when `/login` hands out access tokens
    pub fn issues_tokens(&self) -> bool {
        self.identity_mode == IdentityMode::Token
    }

    /// Hash a password using bcrypt at the configured cost
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Create an access token whose subject is `username`
    pub fn create_access_token(&self, username: &Username) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.access_token_expiration;

        let claims = Claims {
            sub: username.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify an access token and return the username it was issued to
    pub fn verify_access_token(&self, token: &str) -> Result<Username> {
        let claims = self.verify_token(token)?;
        if claims.sub.trim().is_empty() {
            return Err(ServerError::Auth("Invalid token".to_string()));
        }
        Ok(Username::new(claims.sub))
    }
}
