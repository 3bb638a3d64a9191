mod common;

use axum::http::{Method, StatusCode};
use common::{create_course, enroll, register, send, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_teacher_creates_and_lists_courses() {
    let app = setup_test_app();
    let teacher = register(&app, "teacher").await;
    let course_id = create_course(&app, &teacher).await;

    let (status, body) = send(&app, Method::GET, "/api/courses", Some(&teacher.token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["courses"][0]["id"], course_id.as_str());
    assert_eq!(body["courses"][0]["teacher_id"], teacher.id.as_str());
}

#[tokio::test]
async fn test_student_cannot_create_course() {
    let app = setup_test_app();
    let student = register(&app, "student").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&student.token),
        Some(json!({ "title": "Sneaky" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Access denied. Role 'student' cannot 'create' in 'course'."
    );
}

#[tokio::test]
async fn test_enroll_then_view_and_list() {
    let app = setup_test_app();
    let teacher = register(&app, "teacher").await;
    let student = register(&app, "student").await;
    let course_id = create_course(&app, &teacher).await;
    let uri = format!("/api/courses/{course_id}");

    let (status, body) = send(&app, Method::GET, &uri, Some(&student.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not enrolled in this course");

    enroll(&app, &student, &course_id).await;

    let (status, body) = send(&app, Method::GET, &uri, Some(&student.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["enrolled_students"]
            .as_array()
            .unwrap()
            .contains(&json!(student.id))
    );

    let (_, body) = send(&app, Method::GET, "/api/courses", Some(&student.token), None).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_enroll_twice_is_rejected() {
    let app = setup_test_app();
    let teacher = register(&app, "teacher").await;
    let student = register(&app, "student").await;
    let course_id = create_course(&app, &teacher).await;
    enroll(&app, &student, &course_id).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{course_id}/enroll"),
        Some(&student.token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already enrolled");
}

#[tokio::test]
async fn test_teacher_cannot_enroll() {
    let app = setup_test_app();
    let teacher = register(&app, "teacher").await;
    let course_id = create_course(&app, &teacher).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{course_id}/enroll"),
        Some(&teacher.token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_course_is_not_found() {
    let app = setup_test_app();
    let student = register(&app, "student").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/courses/00000000-0000-4000-8000-000000000000",
        Some(&student.token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
}

#[tokio::test]
async fn test_only_owner_updates_course() {
    let app = setup_test_app();
    let owner = register(&app, "teacher").await;
    let other = register(&app, "teacher").await;
    let course_id = create_course(&app, &owner).await;
    let uri = format!("/api/courses/{course_id}");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&other.token),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Can only update your own courses");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&owner.token),
        Some(json!({ "title": "Algebra II", "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Algebra II");
    assert_eq!(body["description"], "Linear equations");
}

#[tokio::test]
async fn test_teacher_manages_roster() {
    let app = setup_test_app();
    let teacher = register(&app, "teacher").await;
    let student = register(&app, "student").await;
    let course_id = create_course(&app, &teacher).await;
    let students_uri = format!("/api/courses/{course_id}/students");

    let (status, body) = send(
        &app,
        Method::POST,
        &students_uri,
        Some(&teacher.token),
        Some(json!({ "student_id": student.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student added");

    let (status, body) = send(
        &app,
        Method::POST,
        &students_uri,
        Some(&teacher.token),
        Some(json!({ "student_id": student.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Student already enrolled");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("{students_uri}/{}", student.id),
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course"]["enrolled_students"], json!([]));
}

#[tokio::test]
async fn test_cannot_add_teacher_as_student() {
    let app = setup_test_app();
    let teacher = register(&app, "teacher").await;
    let colleague = register(&app, "teacher").await;
    let course_id = create_course(&app, &teacher).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{course_id}/students"),
        Some(&teacher.token),
        Some(json!({ "student_id": colleague.id })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only students can be enrolled in courses");
}

#[tokio::test]
async fn test_other_teacher_cannot_manage_roster() {
    let app = setup_test_app();
    let owner = register(&app, "teacher").await;
    let other = register(&app, "teacher").await;
    let student = register(&app, "student").await;
    let course_id = create_course(&app, &owner).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{course_id}/students"),
        Some(&other.token),
        Some(json!({ "student_id": student.id })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Can only manage your own courses");
}

#[tokio::test]
async fn test_unparsable_ids_in_course_paths_are_not_found() {
    let app = setup_test_app();
    let teacher = register(&app, "teacher").await;
    let course_id = create_course(&app, &teacher).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/courses/missing123",
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/courses/{course_id}/students/missing123"),
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");
}
