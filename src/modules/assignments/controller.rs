use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use lectern_core::AppError;
use lectern_models::{
    Assignment, AssignmentId, AssignmentListResponse, CreateAssignmentDto, UpdateAssignmentDto,
};
use tracing::instrument;

use super::service::AssignmentService;
use crate::middleware::auth::{
    RequireAssignmentCreate, RequireAssignmentUpdate, RequireAssignmentView,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ResourcePath, ValidatedJson};

/// List assignments from the caller's courses
#[utoipa::path(
    get,
    path = "/api/assignments",
    responses(
        (status = 200, description = "Assignments ordered by due date", body = AssignmentListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
    RequireAssignmentView(principal): RequireAssignmentView,
) -> Result<Json<AssignmentListResponse>, AppError> {
    let assignments = AssignmentService::list_assignments(&state.store, principal).await?;
    Ok(Json(assignments))
}

/// Get an assignment
#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(("id" = String, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment", body = Assignment),
        (status = 403, description = "Not enrolled or not the course teacher", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_assignment(
    State(state): State<AppState>,
    RequireAssignmentView(principal): RequireAssignmentView,
    ResourcePath(id): ResourcePath<AssignmentId>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = AssignmentService::get_assignment(&state.store, principal, id).await?;
    Ok(Json(assignment))
}

/// Create an assignment in one of the caller's courses
#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Missing or malformed field", body = ErrorResponse),
        (status = 403, description = "Not the course teacher", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireAssignmentCreate(principal): RequireAssignmentCreate,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = AssignmentService::create_assignment(&state.store, principal, dto).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Update an assignment in one of the caller's courses
#[utoipa::path(
    put,
    path = "/api/assignments/{id}",
    params(("id" = String, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 403, description = "Not the course teacher", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireAssignmentUpdate(principal): RequireAssignmentUpdate,
    ResourcePath(id): ResourcePath<AssignmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<Assignment>, AppError> {
    let assignment =
        AssignmentService::update_assignment(&state.store, principal, id, dto).await?;
    Ok(Json(assignment))
}
