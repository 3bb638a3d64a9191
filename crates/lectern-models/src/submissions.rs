//! Student submissions and grading.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{AssignmentId, SubmissionId, UserId};

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub content: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<UserId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

/// A grade outside `[0, 100]` (or not a number at all).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeOutOfRange(pub f64);

impl fmt::Display for GradeOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grade must be between {} and {}, got {}",
            MIN_GRADE, MAX_GRADE, self.0
        )
    }
}

impl std::error::Error for GradeOutOfRange {}

pub fn check_grade(grade: f64) -> Result<f64, GradeOutOfRange> {
    if (MIN_GRADE..=MAX_GRADE).contains(&grade) {
        Ok(grade)
    } else {
        Err(GradeOutOfRange(grade))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubmissionDto {
    /// Assignment id as sent; one that does not parse is reported as not found.
    pub assignment_id: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GradeSubmissionDto {
    /// Between 0 and 100 inclusive.
    pub grade: f64,
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionListResponse {
    pub count: usize,
    pub submissions: Vec<Submission>,
}
