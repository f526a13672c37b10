use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::helpers::{spawn_app, spawn_app_with};

#[tokio::test]
async fn health_is_public() {
    let app = spawn_app().await;

    let res = app.get_as("/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "ok");
}

#[tokio::test]
async fn register_then_login_returns_bearer_token() {
    let app = spawn_app().await;
    app.register("user", "123", None).await;

    let res = app
        .post_login(json!({ "username": "user", "password": "123" }))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
}

#[tokio::test]
async fn register_succeeds_with_plain_text_body() {
    let app = spawn_app().await;

    let res = app
        .post_register(json!({
            "username": "alice",
            "password": "pw",
            "email": "alice@test.com",
            "name": "Alice",
        }))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "User registered successfully");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = spawn_app().await;
    app.register("user", "123", None).await;

    let wrong = app
        .post_login(json!({ "username": "user", "password": "nope" }))
        .await;
    let unknown = app
        .post_login(json!({ "username": "ghost", "password": "123" }))
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, "Invalid username or password");
    assert_eq!(unknown.status, wrong.status);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn auth_type_is_matched_case_insensitively() {
    let app = spawn_app().await;
    app.register("user", "123", None).await;

    let res = app
        .post_login(json!({ "username": "user", "password": "123", "auth_type": "local" }))
        .await;

    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn unsupported_auth_type_is_bad_request() {
    let app = spawn_app().await;
    app.register("user", "123", None).await;

    let res = app
        .post_login(json!({ "username": "user", "password": "123", "auth_type": "OAUTH" }))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Unsupported auth type: OAUTH");
}

#[tokio::test]
async fn blank_login_fields_are_reported_per_field() {
    let app = spawn_app().await;

    let res = app.post_login(json!({ "username": "  " })).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert!(body["username"].is_string());
    assert!(body["password"].is_string());
}

#[tokio::test]
async fn duplicate_username_and_email_are_rejected() {
    let app = spawn_app().await;
    app.register("user", "123", None).await;

    let res = app
        .post_register(json!({
            "username": "user",
            "password": "x",
            "email": "other@test.com",
            "name": "Other",
        }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Username already exists");

    let res = app
        .post_register(json!({
            "username": "other",
            "password": "x",
            "email": "USER@test.com",
            "name": "Other",
        }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Email already exists");
}

#[tokio::test]
async fn request_id_is_generated_when_missing() {
    let app = spawn_app().await;

    let res = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn body_over_configured_limit_is_rejected() {
    let app = spawn_app_with(&[("HTTP_BODY_LIMIT_BYTES", "64")]).await;

    let res = app
        .post_login(json!({ "username": "user", "password": "x".repeat(128) }))
        .await;

    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
}
