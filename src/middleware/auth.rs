use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use lectern_auth::AuthenticationProvider;
use lectern_core::AppError;
use lectern_models::{Principal, Role, UserId};

use crate::state::AppState;

/// Extractor that validates the bearer token and yields the caller's
/// [`Principal`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format".to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let principal = state.authenticator.authenticate(token)?;
        Ok(AuthUser(principal))
    }
}

/// Defines an extractor that authenticates the caller and then asks the
/// [`AccessGate`](lectern_rbac::AccessGate) whether their role may perform
/// `action` in `module`.
#[macro_export]
macro_rules! require_access {
    ($name:ident, $module:literal, $action:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub $crate::lectern_models::Principal);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = $crate::lectern_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let $crate::middleware::auth::AuthUser(principal) =
                    <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                        $crate::state::AppState,
                    >>::from_request_parts(parts, state)
                    .await?;

                state
                    .gate
                    .check(&principal, $module, $action)
                    .map_err($crate::lectern_rbac::AccessDenied::into_app_error)?;

                Ok($name(principal))
            }
        }
    };
}

// Courses
require_access!(RequireCourseView, "course", "view");
require_access!(RequireCourseCreate, "course", "create");
require_access!(RequireCourseUpdate, "course", "update");
require_access!(RequireCourseEnroll, "course", "enroll");
require_access!(RequireCourseManageStudents, "course", "manage_students");

// Assignments
require_access!(RequireAssignmentView, "assignment", "view");
require_access!(RequireAssignmentCreate, "assignment", "create");
require_access!(RequireAssignmentUpdate, "assignment", "update");

// Submissions
require_access!(RequireSubmissionCreate, "submission", "create");
require_access!(RequireSubmissionViewOwn, "submission", "view_own");
require_access!(RequireSubmissionViewAll, "submission", "view_all");
require_access!(RequireSubmissionGrade, "submission", "grade");

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/courses");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let err = bearer_token(&parts_with(None)).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Missing authorization header");
    }

    #[test]
    fn test_non_bearer_scheme_is_rejected() {
        let err = bearer_token(&parts_with(Some("Basic dXNlcjpwYXNz"))).unwrap_err();
        assert_eq!(err.message(), "Invalid authorization header format");
    }
}
