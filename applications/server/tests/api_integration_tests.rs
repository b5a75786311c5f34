/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::http::{header, Method, StatusCode};
use cinelist_server::IdentityMode;
use common::{fixtures, TestApp};
use serde_json::json;

/// Walk the whole account and playlist lifecycle over HTTP
#[tokio::test]
async fn test_end_to_end_playlist_lifecycle() {
    let app = TestApp::new(IdentityMode::Header).await;
    let alice = [("username", "alice")];

    let (status, body) = app.signup("alice", "pw1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");

    let (status, body) = app.login("alice", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert!(body.get("accessToken").is_none());

    let (status, playlist) = app
        .send(
            Method::POST,
            "/playlists",
            &alice,
            Some(json!({ "name": "Favorites" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(playlist["name"], "Favorites");
    assert_eq!(playlist["username"], "alice");
    assert_eq!(playlist["items"].as_array().unwrap().len(), 0);
    assert_eq!(playlist["createdAt"], playlist["updatedAt"]);
    let id = playlist["id"].as_str().unwrap().to_string();

    let items_uri = format!("/playlists/{}/items", id);
    let (status, playlist) = app
        .send(
            Method::POST,
            &items_uri,
            &alice,
            Some(fixtures::movie("tt001", "Movie A")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = playlist["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["mediaId"], "tt001");
    assert_eq!(items[0]["mediaType"], "movie");
    assert!(items[0]["addedAt"].is_string());

    let (status, body) = app
        .send(
            Method::POST,
            &items_uri,
            &alice,
            Some(fixtures::movie("tt001", "Movie A")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item already in playlist");

    let (status, playlist) = app
        .send(
            Method::DELETE,
            &format!("/playlists/{}/items/tt001", id),
            &alice,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(playlist["items"].as_array().unwrap().len(), 0);

    let playlist_uri = format!("/playlists/{}", id);
    let (status, body) = app.send(Method::DELETE, &playlist_uri, &alice, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Playlist deleted");

    let (status, body) = app.send(Method::GET, &playlist_uri, &alice, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Playlist not found");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(IdentityMode::Header).await;

    let (status, body) = app.send(Method::GET, "/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_signup_rejects_existing_username() {
    let app = TestApp::new(IdentityMode::Header).await;

    let (status, _) = app.signup("alice", "pw1").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.signup("alice", "other").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists");

    // The first password still works
    let (status, _) = app.login("alice", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.login("alice", "other").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_requires_both_fields() {
    let app = TestApp::new(IdentityMode::Header).await;

    let (status, body) = app
        .send(Method::POST, "/signup", &[], Some(json!({ "password": "pw" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = app
        .send(Method::POST, "/signup", &[], Some(json!({ "username": "bob" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.signup("   ", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.signup("bob", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_uses_message_body() {
    let app = TestApp::new(IdentityMode::Header).await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new(IdentityMode::Header).await;
    app.signup(fixtures::TEST_USERNAME, fixtures::TEST_PASSWORD)
        .await;

    let (status, body) = app.login("nobody", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User not found");

    let (status, body) = app.login(fixtures::TEST_USERNAME, "wrong").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");

    // Usernames are matched exactly
    let (status, _) = app.login("Alice", fixtures::TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_playlist_routes_require_identity() {
    let app = TestApp::new(IdentityMode::Header).await;

    let routes = [
        (Method::GET, "/playlists"),
        (Method::POST, "/playlists"),
        (Method::GET, "/playlists/p1"),
        (Method::PUT, "/playlists/p1"),
        (Method::DELETE, "/playlists/p1"),
        (Method::POST, "/playlists/p1/items"),
        (Method::DELETE, "/playlists/p1/items/tt001"),
    ];

    for (method, uri) in routes {
        let (status, body) = app
            .send(method.clone(), uri, &[], Some(json!({ "name": "x" })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["message"], "Authentication required");
    }

    let (status, _) = app
        .send(Method::GET, "/playlists", &[("username", "")], None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_ascii_username_can_use_playlists() {
    let app = TestApp::new(IdentityMode::Header).await;
    let jose = [("username", "José")];

    let (status, _) = app.signup("José", "pw1").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.login("José", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "José");

    let (status, body) = app.send(Method::GET, "/playlists", &jose, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body, json!([]));

    let (status, playlist) = app
        .send(
            Method::POST,
            "/playlists",
            &jose,
            Some(json!({ "name": "Películas" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(playlist["username"], "José");

    // A different spelling is a different user
    let (_, list) = app
        .send(Method::GET, "/playlists", &[("username", "Jose")], None)
        .await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_signup_rejects_names_a_header_cannot_carry() {
    let app = TestApp::new(IdentityMode::Header).await;

    for name in [" bob", "bob ", "bo\tb"] {
        let (status, body) = app.signup(name, "pw1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {name:?}");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_playlists_are_isolated_between_users() {
    let app = TestApp::new(IdentityMode::Header).await;
    let id = app.create_playlist_as("alice", "Private").await;
    let uri = format!("/playlists/{}", id);
    let bob = [("username", "bob")];

    let (status, body) = app.send(Method::GET, "/playlists", &bob, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = app.send(Method::GET, &uri, &bob, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::PUT, &uri, &bob, Some(json!({ "name": "Mine now" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("{}/items", uri),
            &bob,
            Some(fixtures::movie("tt001", "Movie A")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &uri, &bob, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, playlist) = app
        .send(Method::GET, &uri, &[("username", "alice")], None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(playlist["name"], "Private");
}

#[tokio::test]
async fn test_create_and_update_validation() {
    let app = TestApp::new(IdentityMode::Header).await;
    let alice = [("username", "alice")];

    let (status, body) = app
        .send(Method::POST, "/playlists", &alice, Some(json!({ "name": "  " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, playlist) = app
        .send(
            Method::POST,
            "/playlists",
            &alice,
            Some(json!({ "name": "  Weekend  ", "description": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(playlist["name"], "Weekend");
    assert!(playlist["description"].is_null());

    let uri = format!("/playlists/{}", playlist["id"].as_str().unwrap());
    let (status, updated) = app
        .send(
            Method::PUT,
            &uri,
            &alice,
            Some(json!({ "name": "Weekend", "description": "Popcorn" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Popcorn");
    assert_eq!(updated["createdAt"], playlist["createdAt"]);

    // Omitted description is cleared; omitted name is invalid
    let (status, updated) = app
        .send(Method::PUT, &uri, &alice, Some(json!({ "name": "Weekend" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["description"].is_null());

    let (status, _) = app
        .send(Method::PUT, &uri, &alice, Some(json!({ "description": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_item_validation() {
    let app = TestApp::new(IdentityMode::Header).await;
    let alice = [("username", "alice")];
    let id = app.create_playlist_as("alice", "Mixed").await;
    let uri = format!("/playlists/{}/items", id);

    let invalid = [
        json!({ "title": "No id", "mediaType": "movie" }),
        json!({ "mediaId": "tt001", "mediaType": "movie" }),
        json!({ "mediaId": "tt001", "title": "No type" }),
        json!({ "mediaId": "tt001", "title": "Bad type", "mediaType": "podcast" }),
    ];
    for body in invalid {
        let (status, _) = app.send(Method::POST, &uri, &alice, Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {body}");
    }

    let (status, playlist) = app
        .send(
            Method::POST,
            &uri,
            &alice,
            Some(json!({ "mediaId": "tv-9", "title": " Show ", "poster": "", "mediaType": "tv" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let item = &playlist["items"][0];
    assert_eq!(item["title"], "Show");
    assert!(item["poster"].is_null());
    assert_eq!(item["mediaType"], "tv");
}

#[tokio::test]
async fn test_list_orders_by_last_update() {
    let app = TestApp::new(IdentityMode::Header).await;
    let alice = [("username", "alice")];

    let first = app.create_playlist_as("alice", "First").await;
    let second = app.create_playlist_as("alice", "Second").await;

    let (_, list) = app.send(Method::GET, "/playlists", &alice, None).await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/playlists/{}/items", first),
            &alice,
            Some(fixtures::movie("tt001", "Movie A")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.send(Method::GET, "/playlists", &alice, None).await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[tokio::test]
async fn test_remove_absent_item_succeeds() {
    let app = TestApp::new(IdentityMode::Header).await;
    let alice = [("username", "alice")];
    let id = app.create_playlist_as("alice", "Favorites").await;

    app.send(
        Method::POST,
        &format!("/playlists/{}/items", id),
        &alice,
        Some(fixtures::movie("tt001", "Movie A")),
    )
    .await;

    let (status, playlist) = app
        .send(
            Method::DELETE,
            &format!("/playlists/{}/items/tt404", id),
            &alice,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(playlist["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_token_mode_login_and_access() {
    let app = TestApp::new(IdentityMode::Token).await;

    app.signup("alice", "pw1").await;
    let (status, body) = app.login("alice", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["tokenType"], "Bearer");
    let token = body["accessToken"].as_str().unwrap().to_string();
    let bearer = format!("Bearer {}", token);

    // The plain header is not enough in token mode
    let (status, _) = app
        .send(Method::GET, "/playlists", &[("username", "alice")], None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::GET,
            "/playlists",
            &[("authorization", "Bearer not-a-token")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let (status, playlist) = app
        .send(
            Method::POST,
            "/playlists",
            &[("authorization", bearer.as_str())],
            Some(json!({ "name": "Token list" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(playlist["username"], "alice");

    // A header claiming another user does not override the token
    let (status, list) = app
        .send(
            Method::GET,
            "/playlists",
            &[("authorization", bearer.as_str()), ("username", "mallory")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new(IdentityMode::Header).await;

    let (status, _) = app.send(Method::GET, "/tracks", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
