//! Assignments belong to a course and inherit its teacher as their owner.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{AssignmentId, CourseId};

pub const DEFAULT_MAX_SCORE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: AssignmentId,
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_score: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Course id as sent; one that does not parse is reported as not found.
    pub course_id: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    /// Defaults to 100.
    #[validate(range(min = 1, message = "Max score must be positive"))]
    pub max_score: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentDto {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    #[validate(range(min = 1, message = "Max score must be positive"))]
    pub max_score: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignmentListResponse {
    pub count: usize,
    pub assignments: Vec<Assignment>,
}
