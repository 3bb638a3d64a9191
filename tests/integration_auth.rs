mod common;

use axum::http::{Method, StatusCode};
use common::{generate_unique_email, register, send, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_register_returns_token_and_user() {
    let app = setup_test_app();
    let email = generate_unique_email();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Ada Lovelace",
            "email": email,
            "password": "testpass123",
            "role": "teacher"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "teacher");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = setup_test_app();
    let user = register(&app, "student").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Someone Else",
            "email": user.email.to_uppercase(),
            "password": "testpass123",
            "role": "student"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_register_unknown_role() {
    let app = setup_test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Root",
            "email": generate_unique_email(),
            "password": "testpass123",
            "role": "admin"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = setup_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "No Email",
            "password": "testpass123",
            "role": "student"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");
}

#[tokio::test]
async fn test_register_short_password_fails_validation() {
    let app = setup_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Short",
            "email": generate_unique_email(),
            "password": "abc",
            "role": "student"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_login_success() {
    let app = setup_test_app();
    let user = register(&app, "student").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "testpass123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("token").is_some());
    assert_eq!(body["user"]["id"], user.id.as_str());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = setup_test_app();
    let user = register(&app, "student").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "wrongpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@test.com", "password": "testpass123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = setup_test_app();
    let user = register(&app, "teacher").await;

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&user.token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.as_str());
    assert_eq!(body["role"], "teacher");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = setup_test_app();

    let (status, body) = send(&app, Method::GET, "/api/courses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/courses",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
