#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use lectern::lectern_config::{CorsConfig, JwtConfig};
use lectern::lectern_db::Store;
use lectern::lectern_rbac::PermissionTable;
use lectern::router::init_router;
use lectern::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-key-long-enough".to_string(),
        access_token_expiry: 3600,
    }
}

/// An app over a fresh in-memory store with the built-in permission table.
pub fn setup_test_app() -> Router {
    setup_test_app_with_table(PermissionTable::builtin().expect("builtin permission table"))
}

pub fn setup_test_app_with_table(table: PermissionTable) -> Router {
    let state = AppState::new(
        Store::memory(),
        table,
        test_jwt_config(),
        CorsConfig::default(),
    );
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Sends a request and returns the status with the parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn register(app: &Router, role: &str) -> TestUser {
    let email = generate_unique_email();
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": format!("Test {role}"),
            "email": email,
            "password": "testpass123",
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    TestUser {
        id: body["user"]["id"].as_str().unwrap().to_string(),
        email,
        token: body["token"].as_str().unwrap().to_string(),
    }
}

pub async fn create_course(app: &Router, teacher: &TestUser) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/courses",
        Some(&teacher.token),
        Some(json!({ "title": "Algebra", "description": "Linear equations" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create course failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

pub async fn enroll(app: &Router, student: &TestUser, course_id: &str) {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/api/courses/{course_id}/enroll"),
        Some(&student.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "enroll failed: {body}");
}

pub async fn create_assignment(app: &Router, teacher: &TestUser, course_id: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/assignments",
        Some(&teacher.token),
        Some(json!({
            "title": "Homework 1",
            "description": "Exercises 1-10",
            "course_id": course_id,
            "due_date": "2030-01-15T12:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create assignment failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

pub async fn submit(app: &Router, student: &TestUser, assignment_id: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/submissions",
        Some(&student.token),
        Some(json!({ "assignment_id": assignment_id, "content": "My answer" })),
    )
    .await
}

/// A teacher with a course and an assignment, and a student enrolled in it.
pub struct Classroom {
    pub app: Router,
    pub teacher: TestUser,
    pub student: TestUser,
    pub course_id: String,
    pub assignment_id: String,
}

pub async fn classroom() -> Classroom {
    let app = setup_test_app();
    let teacher = register(&app, "teacher").await;
    let student = register(&app, "student").await;
    let course_id = create_course(&app, &teacher).await;
    enroll(&app, &student, &course_id).await;
    let assignment_id = create_assignment(&app, &teacher, &course_id).await;

    Classroom {
        app,
        teacher,
        student,
        course_id,
        assignment_id,
    }
}
