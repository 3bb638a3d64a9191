use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use lectern_core::AppError;
use lectern_models::{AuthResponse, LoginRequest, RegisterRequest, User};
use tracing::instrument;
use utoipa::ToSchema;

use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a new student or teacher
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Missing field, unknown role or email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register(&state.store, &state.jwt_config, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login(&state.store, &state.jwt_config, dto).await?;
    Ok(Json(response))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Authenticated user", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<User>, AppError> {
    let user = AuthService::current_user(&state.store, principal).await?;
    Ok(Json(user))
}
