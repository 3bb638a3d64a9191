mod common;

use axum::http::{Method, StatusCode};
use common::{register, send, setup_test_app_with_table};
use lectern::lectern_rbac::PermissionTable;
use serde_json::json;

#[test]
fn test_shipped_config_matches_builtin_table() {
    let shipped = PermissionTable::from_path(std::path::Path::new("config/permissions.json"))
        .expect("config/permissions.json should parse");
    assert_eq!(shipped, PermissionTable::builtin().unwrap());
}

#[tokio::test]
async fn test_unknown_module_is_a_server_error() {
    let table = PermissionTable::load(r#"{"assignment": {"teacher": {"view": true}}}"#).unwrap();
    let app = setup_test_app_with_table(table);
    let teacher = register(&app, "teacher").await;

    let (status, body) = send(&app, Method::GET, "/api/courses", Some(&teacher.token), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Module 'course' not found in permissions.");
}

#[tokio::test]
async fn test_unconfigured_role_is_forbidden() {
    let table = PermissionTable::load(r#"{"course": {"teacher": {"view": true}}}"#).unwrap();
    let app = setup_test_app_with_table(table);
    let student = register(&app, "student").await;

    let (status, body) = send(&app, Method::GET, "/api/courses", Some(&student.token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Role 'student' not configured for 'course'.");
}

#[tokio::test]
async fn test_table_change_revokes_action() {
    let table = PermissionTable::load(
        r#"{"course": {"teacher": {"view": true, "create": false}, "student": {"view": true}}}"#,
    )
    .unwrap();
    let app = setup_test_app_with_table(table);
    let teacher = register(&app, "teacher").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&teacher.token),
        Some(json!({ "title": "Blocked" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_gate_runs_before_body_validation() {
    let app = setup_test_app_with_table(PermissionTable::builtin().unwrap());
    let student = register(&app, "student").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&student.token),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
