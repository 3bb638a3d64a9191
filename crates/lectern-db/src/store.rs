use chrono::{DateTime, Utc};
use lectern_core::AppError;
use lectern_models::{
    Assignment, AssignmentId, Course, CourseId, Role, Submission, SubmissionId,
    UpdateAssignmentDto, UpdateCourseDto, User, UserCredentials, UserId,
};
use lectern_rbac::ResourceLookup;
use sqlx::PgPool;

use crate::memory::MemoryStore;
use crate::postgres::PgStore;

/// Outcome of a create guarded by a uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Inserted<T> {
    Created(T),
    /// A row with the same unique key already exists; nothing was written.
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub max_score: i32,
}

#[derive(Debug, Clone)]
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

macro_rules! dispatch {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match $self {
            Store::Postgres(store) => store.$method($($arg),*).await,
            Store::Memory(store) => store.$method($($arg),*).await,
        }
    };
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Store::Postgres(PgStore::new(pool))
    }

    pub fn memory() -> Self {
        Store::Memory(MemoryStore::default())
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }

    pub async fn create_user(&self, user: NewUser) -> Result<Inserted<User>, AppError> {
        dispatch!(self.create_user(user))
    }

    pub async fn find_user(&self, id: UserId) -> Result<Option<User>, AppError> {
        dispatch!(self.find_user(id))
    }

    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        dispatch!(self.find_credentials_by_email(email))
    }

    pub async fn create_course(
        &self,
        teacher_id: UserId,
        title: String,
        description: Option<String>,
        content: Option<String>,
    ) -> Result<Course, AppError> {
        dispatch!(self.create_course(teacher_id, title, description, content))
    }

    /// Returns `None` when the course no longer exists.
    pub async fn update_course(
        &self,
        id: CourseId,
        changes: UpdateCourseDto,
    ) -> Result<Option<Course>, AppError> {
        dispatch!(self.update_course(id, normalize_course_changes(changes)))
    }

    pub async fn list_courses_taught_by(&self, teacher_id: UserId) -> Result<Vec<Course>, AppError> {
        dispatch!(self.list_courses_taught_by(teacher_id))
    }

    pub async fn list_courses_attended_by(
        &self,
        student_id: UserId,
    ) -> Result<Vec<Course>, AppError> {
        dispatch!(self.list_courses_attended_by(student_id))
    }

    pub async fn enroll_student(
        &self,
        course_id: CourseId,
        student_id: UserId,
    ) -> Result<Inserted<Course>, AppError> {
        dispatch!(self.enroll_student(course_id, student_id))
    }

    /// Removing a student who is not enrolled leaves the roster unchanged.
    pub async fn unenroll_student(
        &self,
        course_id: CourseId,
        student_id: UserId,
    ) -> Result<Option<Course>, AppError> {
        dispatch!(self.unenroll_student(course_id, student_id))
    }

    pub async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment, AppError> {
        dispatch!(self.create_assignment(assignment))
    }

    pub async fn update_assignment(
        &self,
        id: AssignmentId,
        changes: UpdateAssignmentDto,
    ) -> Result<Option<Assignment>, AppError> {
        dispatch!(self.update_assignment(id, normalize_assignment_changes(changes)))
    }

    pub async fn list_assignments_for_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Assignment>, AppError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        dispatch!(self.list_assignments_for_courses(course_ids))
    }

    pub async fn create_submission(
        &self,
        assignment_id: AssignmentId,
        student_id: UserId,
        content: String,
    ) -> Result<Inserted<Submission>, AppError> {
        dispatch!(self.create_submission(assignment_id, student_id, content))
    }

    pub async fn list_submissions_by_student(
        &self,
        student_id: UserId,
        graded_only: bool,
    ) -> Result<Vec<Submission>, AppError> {
        dispatch!(self.list_submissions_by_student(student_id, graded_only))
    }

    pub async fn list_submissions_for_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<Submission>, AppError> {
        dispatch!(self.list_submissions_for_assignment(assignment_id))
    }

    pub async fn grade_submission(
        &self,
        id: SubmissionId,
        grade: f64,
        feedback: String,
        graded_by: UserId,
    ) -> Result<Option<Submission>, AppError> {
        dispatch!(self.grade_submission(id, grade, feedback, graded_by))
    }
}

impl ResourceLookup for Store {
    async fn find_course(&self, id: CourseId) -> Result<Option<Course>, AppError> {
        dispatch!(self.find_course(id))
    }

    async fn find_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, AppError> {
        dispatch!(self.find_assignment(id))
    }

    async fn find_submission(&self, id: SubmissionId) -> Result<Option<Submission>, AppError> {
        dispatch!(self.find_submission(id))
    }

    async fn find_submission_for(
        &self,
        assignment_id: AssignmentId,
        student_id: UserId,
    ) -> Result<Option<Submission>, AppError> {
        dispatch!(self.find_submission_for(assignment_id, student_id))
    }
}

/// Empty strings in a partial update mean "leave unchanged".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_course_changes(changes: UpdateCourseDto) -> UpdateCourseDto {
    UpdateCourseDto {
        title: non_empty(changes.title),
        description: non_empty(changes.description),
        content: non_empty(changes.content),
    }
}

fn normalize_assignment_changes(changes: UpdateAssignmentDto) -> UpdateAssignmentDto {
    UpdateAssignmentDto {
        title: non_empty(changes.title),
        description: non_empty(changes.description),
        ..changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_dropped_from_course_changes() {
        let changes = normalize_course_changes(UpdateCourseDto {
            title: Some("  ".into()),
            description: Some("New description".into()),
            content: None,
        });
        assert_eq!(changes.title, None);
        assert_eq!(changes.description.as_deref(), Some("New description"));
    }

    #[test]
    fn test_assignment_changes_keep_non_text_fields() {
        let changes = normalize_assignment_changes(UpdateAssignmentDto {
            title: Some(String::new()),
            max_score: Some(50),
            ..Default::default()
        });
        assert_eq!(changes.title, None);
        assert_eq!(changes.max_score, Some(50));
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(Store::memory().backend(), "memory");
    }
}
