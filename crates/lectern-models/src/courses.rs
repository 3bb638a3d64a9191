//! Courses and their enrollment roster.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{CourseId, UserId};

/// A course owned by exactly one teacher.
///
/// `enrolled_students` is a set, so a student can never appear twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub teacher_id: UserId,
    #[schema(value_type = Vec<String>)]
    pub enrolled_students: BTreeSet<UserId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    pub fn is_taught_by(&self, user_id: &UserId) -> bool {
        self.teacher_id == *user_id
    }

    pub fn has_student(&self, user_id: &UserId) -> bool {
        self.enrolled_students.contains(user_id)
    }
}

/// The `courses` row without the roster.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub teacher_id: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseRow {
    pub fn with_students(self, enrolled_students: BTreeSet<UserId>) -> Course {
        Course {
            id: self.id,
            title: self.title,
            description: self.description,
            content: self.content,
            teacher_id: self.teacher_id,
            enrolled_students,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
}

/// Empty strings leave the stored value untouched.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddStudentDto {
    pub student_id: UserId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseListResponse {
    pub count: usize,
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentResponse {
    pub message: String,
    pub course: Course,
}
