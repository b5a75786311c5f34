//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use cinelist_server::{create_router, AppState, AuthService, IdentityMode};
use cinelist_storage::SqliteStore;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";

/// Router over a fresh file-backed database
pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new(identity_mode: IdentityMode) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = cinelist_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        cinelist_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let store = Arc::new(SqliteStore::new(pool));
        // Lowest bcrypt cost keeps the suite fast
        let auth_service = Arc::new(AuthService::new(
            identity_mode,
            4,
            TEST_SECRET.to_string(),
            1,
        ));

        let router = create_router(AppState::new(Arc::clone(&store), Arc::clone(&auth_service)));

        Self {
            router,
            store,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and decode the JSON response body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            // Raw bytes, so UTF-8 header values go through as a client sends them
            let value = HeaderValue::from_bytes(value.as_bytes()).unwrap();
            builder = builder.header(*name, value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn signup(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/signup",
            &[],
            Some(serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/login",
            &[],
            Some(serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Create a playlist as `username` in header mode, returning its id
    pub async fn create_playlist_as(&self, username: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/playlists",
                &[("username", username)],
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}

/// Test fixtures
pub mod fixtures {
    use serde_json::{json, Value};

    pub const TEST_USERNAME: &str = "alice";
    pub const TEST_PASSWORD: &str = "pw1";

    pub fn movie(media_id: &str, title: &str) -> Value {
        json!({
            "mediaId": media_id,
            "title": title,
            "poster": "https://img.example/poster.jpg",
            "mediaType": "movie",
        })
    }
}
