mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    TEST_PASSWORD, body_json, json_request, login, seed_user, send, session_app, set_cookie,
};
use serde_json::json;
use vidtube::modules::auth::store::InMemoryCredentialStore;

fn refresh_with_cookie(refresh_token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/users/refresh-token")
        .header(header::COOKIE, format!("refreshToken={refresh_token}"))
        .body(Body::empty())
        .unwrap()
}

fn get_with_bearer(uri: &str, access_token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let user = seed_user(&store, "ana").await;
    let app = session_app(store.clone());

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/login",
            json!({ "email": "ANA@example.com", "password": TEST_PASSWORD }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let access_cookie = set_cookie(response.headers(), "accessToken").unwrap();
    let refresh_cookie = set_cookie(response.headers(), "refreshToken").unwrap();

    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "ana");
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["access_token"], access_cookie.as_str());
    assert_eq!(body["refresh_token"], refresh_cookie.as_str());

    assert_eq!(
        store.stored_refresh_token(user.id).await.as_deref(),
        Some(refresh_cookie.as_str())
    );
}

#[tokio::test]
async fn test_wrong_password_sets_no_cookies() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let user = seed_user(&store, "ana").await;
    let app = session_app(store.clone());

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/login",
            json!({ "username": "ana", "password": "not-the-password" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_credentials");
    assert!(store.stored_refresh_token(user.id).await.is_none());
}

#[tokio::test]
async fn test_login_requires_identifier() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let app = session_app(store);

    let response = send(
        &app,
        json_request("POST", "/api/v1/users/login", json!({ "password": "x" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_refresh_rotates_and_rejects_reuse() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let user = seed_user(&store, "ana").await;
    let app = session_app(store.clone());

    let (_, first_refresh) = login(&app, "ana").await;

    let response = send(&app, refresh_with_cookie(&first_refresh)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = set_cookie(response.headers(), "refreshToken").unwrap();
    assert_ne!(rotated, first_refresh);
    assert_eq!(
        store.stored_refresh_token(user.id).await.as_deref(),
        Some(rotated.as_str())
    );

    let response = send(&app, refresh_with_cookie(&first_refresh)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "token_mismatch");

    // The rotated token stays valid after the failed reuse.
    let response = send(&app, refresh_with_cookie(&rotated)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_accepts_body_token() {
    let store = Arc::new(InMemoryCredentialStore::new());
    seed_user(&store, "ana").await;
    let app = session_app(store);

    let (_, refresh_token) = login(&app, "ana").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            json!({ "refresh_token": refresh_token }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_refresh_without_token() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let app = session_app(store);

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/v1/users/refresh-token")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let store = Arc::new(InMemoryCredentialStore::new());
    seed_user(&store, "ana").await;
    let app = session_app(store);

    let (access_token, _) = login(&app, "ana").await;

    let response = send(&app, refresh_with_cookie(&access_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let user = seed_user(&store, "ana").await;
    let app = session_app(store.clone());

    let (access_token, refresh_token) = login(&app, "ana").await;

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/v1/users/logout")
            .header(header::COOKIE, format!("accessToken={access_token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        set_cookie(response.headers(), "accessToken").as_deref(),
        Some("")
    );
    assert!(store.stored_refresh_token(user.id).await.is_none());

    let response = send(&app, refresh_with_cookie(&refresh_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "token_mismatch");
}

#[tokio::test]
async fn test_bearer_logout_still_clears_cookies() {
    let store = Arc::new(InMemoryCredentialStore::new());
    seed_user(&store, "ana").await;
    let app = session_app(store);

    let (access_token, _) = login(&app, "ana").await;

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/v1/users/logout")
            .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    for name in ["accessToken", "refreshToken"] {
        assert_eq!(set_cookie(response.headers(), name).as_deref(), Some(""));
    }
    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.contains("HttpOnly") && v.contains("Max-Age=0"))
        .count();
    assert_eq!(cleared, 2);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let app = session_app(store);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/v1/users/current-user")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_bearer_fallback_and_current_user() {
    let store = Arc::new(InMemoryCredentialStore::new());
    seed_user(&store, "ana").await;
    let app = session_app(store);

    let (access_token, _) = login(&app, "ana").await;

    let response = send(
        &app,
        get_with_bearer("/api/v1/users/current-user", &access_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "ana");
}

#[tokio::test]
async fn test_cookie_wins_over_bearer() {
    let store = Arc::new(InMemoryCredentialStore::new());
    seed_user(&store, "ana").await;
    let app = session_app(store);

    let (access_token, _) = login(&app, "ana").await;

    let response = send(
        &app,
        Request::builder()
            .uri("/api/v1/users/current-user")
            .header(header::COOKIE, "accessToken=garbage")
            .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_deleted_user_token_is_rejected() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let user = seed_user(&store, "ana").await;
    let app = session_app(store.clone());

    let (access_token, refresh_token) = login(&app, "ana").await;
    store.remove_user(user.id).await;

    let response = send(
        &app,
        get_with_bearer("/api/v1/users/current-user", &access_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "unknown_user");

    let response = send(&app, refresh_with_cookie(&refresh_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "unknown_user");
}

#[tokio::test]
async fn test_healthcheck() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let app = session_app(store);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/v1/healthcheck")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}
