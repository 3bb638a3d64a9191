use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use lectern_core::AppError;
use lectern_models::{
    AssignmentId, CreateSubmissionDto, GradeSubmissionDto, Submission, SubmissionId,
    SubmissionListResponse,
};
use tracing::instrument;

use super::service::SubmissionService;
use crate::middleware::auth::{
    RequireSubmissionCreate, RequireSubmissionGrade, RequireSubmissionViewAll,
    RequireSubmissionViewOwn,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ResourcePath, ValidatedJson};

/// Submit an assignment
#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission created", body = Submission),
        (status = 400, description = "Already submitted or missing field", body = ErrorResponse),
        (status = 403, description = "Not enrolled in the course", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn submit_assignment(
    State(state): State<AppState>,
    RequireSubmissionCreate(principal): RequireSubmissionCreate,
    ValidatedJson(dto): ValidatedJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let submission = SubmissionService::submit(&state.store, principal, dto).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// List the caller's submissions
#[utoipa::path(
    get,
    path = "/api/submissions/me",
    responses(
        (status = 200, description = "Own submissions", body = SubmissionListResponse),
        (status = 403, description = "Role may not view own submissions", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn my_submissions(
    State(state): State<AppState>,
    RequireSubmissionViewOwn(principal): RequireSubmissionViewOwn,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let submissions = SubmissionService::list_own(&state.store, principal, false).await?;
    Ok(Json(submissions))
}

/// List the caller's graded submissions
#[utoipa::path(
    get,
    path = "/api/submissions/grades",
    responses(
        (status = 200, description = "Graded submissions", body = SubmissionListResponse),
        (status = 403, description = "Role may not view own submissions", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn my_grades(
    State(state): State<AppState>,
    RequireSubmissionViewOwn(principal): RequireSubmissionViewOwn,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let submissions = SubmissionService::list_own(&state.store, principal, true).await?;
    Ok(Json(submissions))
}

/// List every submission for an assignment in one of the caller's courses
#[utoipa::path(
    get,
    path = "/api/submissions/assignment/{assignment_id}",
    params(("assignment_id" = String, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Submissions", body = SubmissionListResponse),
        (status = 403, description = "Not the course teacher", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_for_assignment(
    State(state): State<AppState>,
    RequireSubmissionViewAll(principal): RequireSubmissionViewAll,
    ResourcePath(assignment_id): ResourcePath<AssignmentId>,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let submissions =
        SubmissionService::list_for_assignment(&state.store, principal, assignment_id).await?;
    Ok(Json(submissions))
}

/// Grade a submission
#[utoipa::path(
    put,
    path = "/api/submissions/{id}/grade",
    params(("id" = String, Path, description = "Submission ID")),
    request_body = GradeSubmissionDto,
    responses(
        (status = 200, description = "Submission graded", body = Submission),
        (status = 400, description = "Grade missing or out of range", body = ErrorResponse),
        (status = 403, description = "Not the course teacher", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn grade_submission(
    State(state): State<AppState>,
    RequireSubmissionGrade(principal): RequireSubmissionGrade,
    ResourcePath(id): ResourcePath<SubmissionId>,
    ValidatedJson(dto): ValidatedJson<GradeSubmissionDto>,
) -> Result<Json<Submission>, AppError> {
    let submission = SubmissionService::grade(&state.store, principal, id, dto).await?;
    Ok(Json(submission))
}
