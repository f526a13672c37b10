use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::helpers::{TestApp, spawn_app};

#[tokio::test]
async fn me_requires_a_principal() {
    let app = spawn_app().await;

    let res = app.get_as("/api/users/me", None).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, "Unauthorized");
}

#[tokio::test]
async fn me_returns_the_token_subject() {
    let app = spawn_app().await;
    app.register("user", "123", None).await;
    let token = app.login("user", "123").await;

    let res = app.get_as("/api/users/me", Some(&token)).await;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["username"], "user");
    assert_eq!(body["roles"], serde_json::json!(["USER"]));
}

#[tokio::test]
async fn malformed_token_is_treated_as_anonymous() {
    let app = spawn_app().await;

    // Interceptor passes through; the protected handler rejects.
    let res = app.get_as("/api/users/me", Some("not-a-jwt")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get_as("/health", Some("not-a-jwt")).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn tampered_token_is_treated_as_anonymous() {
    let app = spawn_app().await;
    app.register("user", "123", None).await;
    let token = app.login("user", "123").await;

    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'Q' } else { 'A' });

    let res = app.get_as("/api/users/me", Some(&tampered)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_is_admin_only() {
    let app = spawn_app().await;
    app.register("user", "123", None).await;
    app.register("boss", "456", Some("ADMIN")).await;
    let user_token = app.login("user", "123").await;
    let admin_token = app.login("boss", "456").await;

    let res = app.get_as("/api/users", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get_as("/api/users", Some(&user_token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, "Access Denied");

    let res = app.get_as("/api/users", Some(&admin_token)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "boss");
    assert_eq!(users[0]["role"], "ADMIN");
    assert!(users[0].get("password_hash").is_none());
}

async fn app_with_user_and_admin() -> (TestApp, String, String) {
    let app = spawn_app().await;
    app.register("user", "123", None).await;
    app.register("boss", "456", Some("ADMIN")).await;
    let user_token = app.login("user", "123").await;
    let admin_token = app.login("boss", "456").await;
    (app, user_token, admin_token)
}

#[tokio::test]
async fn update_me_changes_only_the_callers_profile() {
    let (app, user_token, _) = app_with_user_and_admin().await;

    let res = app
        .send_as(
            Method::PUT,
            "/api/users/me",
            Some(&user_token),
            Some(json!({ "name": "New Name", "email": "new@test.com" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["username"], "user");
    assert_eq!(body["name"], "New Name");
    assert_eq!(body["email"], "new@test.com");
}

#[tokio::test]
async fn update_me_requires_a_principal_and_valid_fields() {
    let (app, user_token, _) = app_with_user_and_admin().await;

    let res = app
        .send_as(Method::PUT, "/api/users/me", None, Some(json!({ "name": "X" })))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .send_as(
            Method::PUT,
            "/api/users/me",
            Some(&user_token),
            Some(json!({ "name": " ", "email": "broken" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["name"].is_string());

    let res = app
        .send_as(
            Method::PUT,
            "/api/users/me",
            Some(&user_token),
            Some(json!({ "name": "X", "email": "boss@test.com" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Email already exists");
}

#[tokio::test]
async fn delete_user_is_admin_only() {
    let (app, user_token, admin_token) = app_with_user_and_admin().await;

    let res = app
        .send_as(Method::DELETE, "/api/users/user", None, None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .send_as(Method::DELETE, "/api/users/boss", Some(&user_token), None)
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, "Access Denied");

    let res = app
        .send_as(Method::DELETE, "/api/users/user", Some(&admin_token), None)
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app
        .send_as(Method::DELETE, "/api/users/user", Some(&admin_token), None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "User not found with username: user");
}

#[tokio::test]
async fn token_of_deleted_user_no_longer_authenticates() {
    let (app, user_token, admin_token) = app_with_user_and_admin().await;

    let res = app
        .send_as(Method::DELETE, "/api/users/user", Some(&admin_token), None)
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    // still signed and unexpired, but the principal is gone
    let res = app.get_as("/api/users/me", Some(&user_token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_user_is_admin_only() {
    let (app, user_token, admin_token) = app_with_user_and_admin().await;
    let new_user = json!({
        "username": "carol",
        "password": "789",
        "email": "carol@test.com",
        "fullName": "Carol",
        "role": "USER",
    });

    let res = app
        .send_as(Method::POST, "/api/users/create", None, Some(new_user.clone()))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .send_as(
            Method::POST,
            "/api/users/create",
            Some(&user_token),
            Some(new_user.clone()),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .send_as(
            Method::POST,
            "/api/users/create",
            Some(&admin_token),
            Some(new_user),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["username"], "carol");
    assert_eq!(body["data"]["role"], "USER");

    // the created account can log in
    app.login("carol", "789").await;
}

#[tokio::test]
async fn admin_create_requires_role() {
    let (app, _, admin_token) = app_with_user_and_admin().await;

    let res = app
        .send_as(
            Method::POST,
            "/api/users/create",
            Some(&admin_token),
            Some(json!({
                "username": "dave",
                "password": "pw",
                "email": "dave@test.com",
                "name": "Dave",
            })),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["role"].is_string());
}
