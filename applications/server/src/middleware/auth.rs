/// Identity middleware
use crate::{
    config::IdentityMode,
    error::{Result, ServerError},
    services::AuthService,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use cinelist_core::{CinelistError, Username};
use std::sync::Arc;

/// Header carrying the caller's username in header identity mode
pub const USERNAME_HEADER: &str = "username";

/// Extension type to store the caller's username in request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Username);

impl AuthenticatedUser {
    pub fn username(&self) -> &Username {
        &self.0
    }
}

/// Read the `username` header as UTF-8, so non-ASCII names work
fn header_identity(headers: &HeaderMap) -> Result<Username> {
    let Some(value) = headers.get(USERNAME_HEADER) else {
        return Err(CinelistError::Unauthenticated.into());
    };

    let username = std::str::from_utf8(value.as_bytes())
        .map_err(|_| ServerError::BadRequest("username header is not valid UTF-8".to_string()))?;

    if username.trim().is_empty() {
        return Err(CinelistError::Unauthenticated.into());
    }

    Ok(Username::new(username))
}

fn token_identity(auth_service: &AuthService, headers: &HeaderMap) -> Result<Username> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(CinelistError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(CinelistError::Unauthenticated)?;

    auth_service.verify_access_token(token)
}

/// Middleware that resolves the caller according to the identity mode
///
/// Requests without an identity are rejected here, before any handler or
/// store is reached.
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let username = match auth_service.identity_mode() {
        IdentityMode::Header => header_identity(request.headers())?,
        IdentityMode::Token => token_identity(&auth_service, request.headers())?,
    };

    // Insert username into request extensions
    request.extensions_mut().insert(AuthenticatedUser(username));

    Ok(next.run(request).await)
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| CinelistError::Unauthenticated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_identity_is_taken_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(USERNAME_HEADER, HeaderValue::from_static("Alice"));
        assert_eq!(header_identity(&headers).unwrap(), Username::new("Alice"));
    }

    #[test]
    fn test_non_ascii_header_identity() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USERNAME_HEADER,
            HeaderValue::from_bytes("José".as_bytes()).unwrap(),
        );
        assert_eq!(header_identity(&headers).unwrap(), Username::new("José"));
    }

    #[test]
    fn test_invalid_utf8_header_is_bad_request() {
        let mut headers = HeaderMap::new();
        headers.insert(USERNAME_HEADER, HeaderValue::from_bytes(b"jos\xe9").unwrap());
        assert!(matches!(
            header_identity(&headers),
            Err(ServerError::BadRequest(_))
        ));
    }

    #[test]
    fn test_missing_or_blank_header_is_unauthenticated() {
        let headers = HeaderMap::new();
        assert!(matches!(
            header_identity(&headers),
            Err(ServerError::Core(CinelistError::Unauthenticated))
        ));

        let mut headers = HeaderMap::new();
        headers.insert(USERNAME_HEADER, HeaderValue::from_static("  "));
        assert!(matches!(
            header_identity(&headers),
            Err(ServerError::Core(CinelistError::Unauthenticated))
        ));
    }

    #[test]
    fn test_token_identity() {
        let auth = AuthService::new(IdentityMode::Token, 4, "secret".to_string(), 1);
        let token = auth.create_access_token(&Username::new("alice")).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(
            token_identity(&auth, &headers).unwrap(),
            Username::new("alice")
        );

        // The username header is not an identity in token mode
        let mut headers = HeaderMap::new();
        headers.insert(USERNAME_HEADER, HeaderValue::from_static("alice"));
        assert!(token_identity(&auth, &headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer garbage"));
        assert!(matches!(
            token_identity(&auth, &headers),
            Err(ServerError::Jwt(_))
        ));
    }
}
