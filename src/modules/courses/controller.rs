use anyhow::anyhow;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use lectern_core::AppError;
use lectern_models::{
    AddStudentDto, Course, CourseId, CourseListResponse, CreateCourseDto, EnrollmentResponse,
    UpdateCourseDto, UserId,
};
use lectern_rbac::{Missing, parse_id};
use tracing::instrument;

use super::service::CourseService;
use crate::middleware::auth::{
    RequireCourseCreate, RequireCourseEnroll, RequireCourseManageStudents, RequireCourseUpdate,
    RequireCourseView,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ResourcePath, ValidatedJson};

/// List the caller's courses
#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "Courses the caller teaches or attends", body = CourseListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Role may not view courses", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    RequireCourseView(principal): RequireCourseView,
) -> Result<Json<CourseListResponse>, AppError> {
    let courses = CourseService::list_courses(&state.store, principal).await?;
    Ok(Json(courses))
}

/// Get a course
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 403, description = "Not enrolled or not the course teacher", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    RequireCourseView(principal): RequireCourseView,
    ResourcePath(id): ResourcePath<CourseId>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(&state.store, principal, id).await?;
    Ok(Json(course))
}

/// Create a course owned by the caller
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 403, description = "Role may not create courses", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireCourseCreate(principal): RequireCourseCreate,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.store, principal, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Update one of the caller's courses
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 403, description = "Not the course teacher", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireCourseUpdate(principal): RequireCourseUpdate,
    ResourcePath(id): ResourcePath<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update_course(&state.store, principal, id, dto).await?;
    Ok(Json(course))
}

/// Enroll the calling student in a course
#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled", body = EnrollmentResponse),
        (status = 400, description = "Already enrolled", body = ErrorResponse),
        (status = 403, description = "Role may not enroll", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn enroll(
    State(state): State<AppState>,
    RequireCourseEnroll(principal): RequireCourseEnroll,
    ResourcePath(id): ResourcePath<CourseId>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    let response = CourseService::enroll(&state.store, principal, id).await?;
    Ok(Json(response))
}

/// Add a student to one of the caller's courses
#[utoipa::path(
    post,
    path = "/api/courses/{id}/students",
    params(("id" = String, Path, description = "Course ID")),
    request_body = AddStudentDto,
    responses(
        (status = 200, description = "Student added", body = EnrollmentResponse),
        (status = 400, description = "Student already enrolled or not a student", body = ErrorResponse),
        (status = 403, description = "Not the course teacher", body = ErrorResponse),
        (status = 404, description = "Course or student not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn add_student(
    State(state): State<AppState>,
    RequireCourseManageStudents(principal): RequireCourseManageStudents,
    ResourcePath(id): ResourcePath<CourseId>,
    ValidatedJson(dto): ValidatedJson<AddStudentDto>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    let response = CourseService::add_student(&state.store, principal, id, dto.student_id).await?;
    Ok(Json(response))
}

/// Remove a student from one of the caller's courses
#[utoipa::path(
    delete,
    path = "/api/courses/{id}/students/{student_id}",
    params(
        ("id" = String, Path, description = "Course ID"),
        ("student_id" = String, Path, description = "Student user ID")
    ),
    responses(
        (status = 200, description = "Student removed", body = EnrollmentResponse),
        (status = 403, description = "Not the course teacher", body = ErrorResponse),
        (status = 404, description = "Course or student not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn remove_student(
    State(state): State<AppState>,
    RequireCourseManageStudents(principal): RequireCourseManageStudents,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    let id: CourseId = parse_id(&id).map_err(Missing::into_app_error)?;
    let student_id: UserId = student_id
        .trim()
        .parse()
        .map_err(|_| AppError::not_found(anyhow!("Student not found")))?;
    let response = CourseService::remove_student(&state.store, principal, id, student_id).await?;
    Ok(Json(response))
}
