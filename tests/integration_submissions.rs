mod common;

use axum::http::{Method, StatusCode};
use common::{classroom, register, send, submit};
use serde_json::json;

#[tokio::test]
async fn test_enrolled_student_submits() {
    let room = classroom().await;

    let (status, body) = submit(&room.app, &room.student, &room.assignment_id).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["student_id"], room.student.id.as_str());
    assert_eq!(body["assignment_id"], room.assignment_id.as_str());
    assert!(body["grade"].is_null());
}

#[tokio::test]
async fn test_student_outside_course_cannot_submit() {
    let room = classroom().await;
    let stranger = register(&room.app, "student").await;

    let (status, body) = submit(&room.app, &stranger, &room.assignment_id).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not enrolled in this course");
}

#[tokio::test]
async fn test_double_submission_rejected() {
    let room = classroom().await;
    let (_, first) = submit(&room.app, &room.student, &room.assignment_id).await;

    let (status, body) = send(
        &room.app,
        Method::POST,
        "/api/submissions",
        Some(&room.student.token),
        Some(json!({ "assignment_id": room.assignment_id, "content": "Second try" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already submitted");

    let (status, mine) = send(
        &room.app,
        Method::GET,
        "/api/submissions/me",
        Some(&room.student.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["count"], 1);
    assert_eq!(mine["submissions"][0]["id"], first["id"]);
    assert_eq!(mine["submissions"][0]["content"], "My answer");
}

#[tokio::test]
async fn test_submit_with_unparsable_assignment_id() {
    let room = classroom().await;

    let (status, body) = submit(&room.app, &room.student, "missing123").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Assignment not found");
}

#[tokio::test]
async fn test_submit_to_missing_assignment() {
    let room = classroom().await;

    let (status, body) = submit(
        &room.app,
        &room.student,
        "00000000-0000-4000-8000-000000000000",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Assignment not found");
}

#[tokio::test]
async fn test_teacher_cannot_submit() {
    let room = classroom().await;

    let (status, _) = submit(&room.app, &room.teacher, &room.assignment_id).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_grades_submission() {
    let room = classroom().await;
    let (_, submission) = submit(&room.app, &room.student, &room.assignment_id).await;
    let submission_id = submission["id"].as_str().unwrap();

    let (status, body) = send(
        &room.app,
        Method::PUT,
        &format!("/api/submissions/{submission_id}/grade"),
        Some(&room.teacher.token),
        Some(json!({ "grade": 85, "feedback": "Well argued" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], 85.0);
    assert_eq!(body["feedback"], "Well argued");
    assert_eq!(body["graded_by"], room.teacher.id.as_str());
}

#[tokio::test]
async fn test_other_teacher_cannot_grade() {
    let room = classroom().await;
    let other = register(&room.app, "teacher").await;
    let (_, submission) = submit(&room.app, &room.student, &room.assignment_id).await;
    let submission_id = submission["id"].as_str().unwrap();

    let (status, body) = send(
        &room.app,
        Method::PUT,
        &format!("/api/submissions/{submission_id}/grade"),
        Some(&other.token),
        Some(json!({ "grade": 85 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Can only grade submissions from your courses");
}

#[tokio::test]
async fn test_grade_out_of_range() {
    let room = classroom().await;
    let (_, submission) = submit(&room.app, &room.student, &room.assignment_id).await;
    let submission_id = submission["id"].as_str().unwrap();

    let (status, _) = send(
        &room.app,
        Method::PUT,
        &format!("/api/submissions/{submission_id}/grade"),
        Some(&room.teacher.token),
        Some(json!({ "grade": 150 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_grade_is_required() {
    let room = classroom().await;
    let (_, submission) = submit(&room.app, &room.student, &room.assignment_id).await;
    let submission_id = submission["id"].as_str().unwrap();

    let (status, body) = send(
        &room.app,
        Method::PUT,
        &format!("/api/submissions/{submission_id}/grade"),
        Some(&room.teacher.token),
        Some(json!({ "feedback": "No grade" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "grade is required");
}

#[tokio::test]
async fn test_student_cannot_grade() {
    let room = classroom().await;
    let (_, submission) = submit(&room.app, &room.student, &room.assignment_id).await;
    let submission_id = submission["id"].as_str().unwrap();

    let (status, _) = send(
        &room.app,
        Method::PUT,
        &format!("/api/submissions/{submission_id}/grade"),
        Some(&room.student.token),
        Some(json!({ "grade": 100 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_own_submissions_and_grades() {
    let room = classroom().await;
    let (_, submission) = submit(&room.app, &room.student, &room.assignment_id).await;
    let submission_id = submission["id"].as_str().unwrap();

    let (status, body) = send(
        &room.app,
        Method::GET,
        "/api/submissions/me",
        Some(&room.student.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (_, body) = send(
        &room.app,
        Method::GET,
        "/api/submissions/grades",
        Some(&room.student.token),
        None,
    )
    .await;
    assert_eq!(body["count"], 0);

    send(
        &room.app,
        Method::PUT,
        &format!("/api/submissions/{submission_id}/grade"),
        Some(&room.teacher.token),
        Some(json!({ "grade": 70 })),
    )
    .await;

    let (_, body) = send(
        &room.app,
        Method::GET,
        "/api/submissions/grades",
        Some(&room.student.token),
        None,
    )
    .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["submissions"][0]["feedback"], "");
}

#[tokio::test]
async fn test_teacher_lists_submissions_for_assignment() {
    let room = classroom().await;
    submit(&room.app, &room.student, &room.assignment_id).await;
    let uri = format!("/api/submissions/assignment/{}", room.assignment_id);

    let (status, body) = send(&room.app, Method::GET, &uri, Some(&room.teacher.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let other = register(&room.app, "teacher").await;
    let (status, body) = send(&room.app, Method::GET, &uri, Some(&other.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Can only view submissions from your courses");

    let (status, _) = send(&room.app, Method::GET, &uri, Some(&room.student.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
