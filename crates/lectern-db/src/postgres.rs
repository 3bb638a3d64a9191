//! PostgreSQL backend.
//!
//! Uniqueness is left to the schema: the `users.email` unique index, the
//! `course_enrollments` primary key and `UNIQUE (assignment_id, student_id)` on
//! `submissions`. A violation of any of them is reported as
//! [`Inserted::Duplicate`], so two racing creates can never both succeed.

use lectern_core::AppError;
use lectern_models::{
    Assignment, AssignmentId, Course, CourseId, CourseRow, Submission, SubmissionId,
    UpdateAssignmentDto, UpdateCourseDto, User, UserCredentials, UserId,
};
use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};
use tracing::{error, instrument, warn};

use crate::store::{Inserted, NewAssignment, NewUser};

const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";
const COURSE_COLUMNS: &str = "id, title, description, content, teacher_id, created_at, updated_at";
const ASSIGNMENT_COLUMNS: &str =
    "id, course_id, title, description, due_date, max_score, created_at, updated_at";
const SUBMISSION_COLUMNS: &str = "id, assignment_id, student_id, content, submitted_at, grade, \
     feedback, graded_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn database_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        error!(error = %e, context, "Database error");
        AppError::database(e)
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(skip(self, user), fields(db.operation = "INSERT", db.table = "users"))]
    pub async fn create_user(&self, user: NewUser) -> Result<Inserted<User>, AppError> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(Inserted::Created(user)),
            Err(e) if is_unique_violation(&e) => {
                warn!(user.email = %user.email, "Email already registered");
                Ok(Inserted::Duplicate)
            }
            Err(e) => Err(database_error("create user")(e)),
        }
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_user(&self, id: UserId) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("find user"))
    }

    #[instrument(skip(self, email), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        sqlx::query_as::<_, UserCredentials>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("find user by email"))
    }

    #[instrument(skip(self, title, description, content), fields(db.operation = "INSERT", db.table = "courses"))]
    pub async fn create_course(
        &self,
        teacher_id: UserId,
        title: String,
        description: Option<String>,
        content: Option<String>,
    ) -> Result<Course, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "INSERT INTO courses (title, description, content, teacher_id) VALUES ($1, $2, $3, $4)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(content)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error("create course"))?;

        Ok(row.with_students(BTreeSet::new()))
    }

    #[instrument(skip(self, changes), fields(db.operation = "UPDATE", db.table = "courses"))]
    pub async fn update_course(
        &self,
        id: CourseId,
        changes: UpdateCourseDto,
    ) -> Result<Option<Course>, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "UPDATE courses
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 content = COALESCE($4, content),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("update course"))?;

        match row {
            Some(row) => Ok(Some(self.attach_roster(row).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "courses"))]
    pub async fn find_course(&self, id: CourseId) -> Result<Option<Course>, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("find course"))?;

        match row {
            Some(row) => Ok(Some(self.attach_roster(row).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "courses"))]
    pub async fn list_courses_taught_by(&self, teacher_id: UserId) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE teacher_id = $1 ORDER BY created_at DESC"
        ))
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("list courses by teacher"))?;

        self.attach_rosters(rows).await
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "courses"))]
    pub async fn list_courses_attended_by(
        &self,
        student_id: UserId,
    ) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT c.id, c.title, c.description, c.content, c.teacher_id, c.created_at, c.updated_at
             FROM courses c
             JOIN course_enrollments e ON e.course_id = c.id
             WHERE e.student_id = $1
             ORDER BY c.created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("list courses by student"))?;

        self.attach_rosters(rows).await
    }

    #[instrument(skip(self), fields(db.operation = "INSERT", db.table = "course_enrollments"))]
    pub async fn enroll_student(
        &self,
        course_id: CourseId,
        student_id: UserId,
    ) -> Result<Inserted<Course>, AppError> {
        let result = sqlx::query(
            "INSERT INTO course_enrollments (course_id, student_id) VALUES ($1, $2)",
        )
        .bind(course_id)
        .bind(student_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                warn!(%course_id, %student_id, "Student already enrolled");
                return Ok(Inserted::Duplicate);
            }
            Err(e) => return Err(database_error("enroll student")(e)),
        }

        self.find_course(course_id)
            .await?
            .map(Inserted::Created)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument(skip(self), fields(db.operation = "DELETE", db.table = "course_enrollments"))]
    pub async fn unenroll_student(
        &self,
        course_id: CourseId,
        student_id: UserId,
    ) -> Result<Option<Course>, AppError> {
        sqlx::query("DELETE FROM course_enrollments WHERE course_id = $1 AND student_id = $2")
            .bind(course_id)
            .bind(student_id)
            .execute(&self.pool)
            .await
            .map_err(database_error("unenroll student"))?;

        self.find_course(course_id).await
    }

    async fn attach_roster(&self, row: CourseRow) -> Result<Course, AppError> {
        let students = sqlx::query_scalar::<_, UserId>(
            "SELECT student_id FROM course_enrollments WHERE course_id = $1",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("load roster"))?;

        Ok(row.with_students(students.into_iter().collect()))
    }

    async fn attach_rosters(&self, rows: Vec<CourseRow>) -> Result<Vec<Course>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<CourseId> = rows.iter().map(|row| row.id).collect();
        let pairs = sqlx::query_as::<_, (CourseId, UserId)>(
            "SELECT course_id, student_id FROM course_enrollments WHERE course_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("load rosters"))?;

        let mut rosters: HashMap<CourseId, BTreeSet<UserId>> = HashMap::new();
        for (course_id, student_id) in pairs {
            rosters.entry(course_id).or_default().insert(student_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let students = rosters.remove(&row.id).unwrap_or_default();
                row.with_students(students)
            })
            .collect())
    }

    #[instrument(skip(self, assignment), fields(db.operation = "INSERT", db.table = "assignments"))]
    pub async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "INSERT INTO assignments (course_id, title, description, due_date, max_score)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(assignment.course_id)
        .bind(assignment.title)
        .bind(assignment.description)
        .bind(assignment.due_date)
        .bind(assignment.max_score)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error("create assignment"))
    }

    #[instrument(skip(self, changes), fields(db.operation = "UPDATE", db.table = "assignments"))]
    pub async fn update_assignment(
        &self,
        id: AssignmentId,
        changes: UpdateAssignmentDto,
    ) -> Result<Option<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "UPDATE assignments
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 due_date = COALESCE($4, due_date),
                 max_score = COALESCE($5, max_score),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.due_date)
        .bind(changes.max_score)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("update assignment"))
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "assignments"))]
    pub async fn find_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("find assignment"))
    }

    #[instrument(skip(self, course_ids), fields(db.operation = "SELECT", db.table = "assignments", courses = course_ids.len()))]
    pub async fn list_assignments_for_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
             WHERE course_id = ANY($1)
             ORDER BY due_date ASC"
        ))
        .bind(course_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("list assignments"))
    }

    #[instrument(skip(self, content), fields(db.operation = "INSERT", db.table = "submissions"))]
    pub async fn create_submission(
        &self,
        assignment_id: AssignmentId,
        student_id: UserId,
        content: String,
    ) -> Result<Inserted<Submission>, AppError> {
        let result = sqlx::query_as::<_, Submission>(&format!(
            "INSERT INTO submissions (assignment_id, student_id, content) VALUES ($1, $2, $3)
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(assignment_id)
        .bind(student_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(submission) => Ok(Inserted::Created(submission)),
            Err(e) if is_unique_violation(&e) => {
                warn!(%assignment_id, %student_id, "Submission already exists");
                Ok(Inserted::Duplicate)
            }
            Err(e) => Err(database_error("create submission")(e)),
        }
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "submissions"))]
    pub async fn find_submission(&self, id: SubmissionId) -> Result<Option<Submission>, AppError> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("find submission"))
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "submissions"))]
    pub async fn find_submission_for(
        &self,
        assignment_id: AssignmentId,
        student_id: UserId,
    ) -> Result<Option<Submission>, AppError> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE assignment_id = $1 AND student_id = $2"
        ))
        .bind(assignment_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("find submission for student"))
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "submissions"))]
    pub async fn list_submissions_by_student(
        &self,
        student_id: UserId,
        graded_only: bool,
    ) -> Result<Vec<Submission>, AppError> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE student_id = $1 AND ($2 = FALSE OR grade IS NOT NULL)
             ORDER BY submitted_at DESC"
        ))
        .bind(student_id)
        .bind(graded_only)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("list submissions by student"))
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "submissions"))]
    pub async fn list_submissions_for_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<Submission>, AppError> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE assignment_id = $1
             ORDER BY submitted_at DESC"
        ))
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("list submissions for assignment"))
    }

    #[instrument(skip(self, feedback), fields(db.operation = "UPDATE", db.table = "submissions"))]
    pub async fn grade_submission(
        &self,
        id: SubmissionId,
        grade: f64,
        feedback: String,
        graded_by: UserId,
    ) -> Result<Option<Submission>, AppError> {
        sqlx::query_as::<_, Submission>(&format!(
            "UPDATE submissions
             SET grade = $2, feedback = $3, graded_by = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(id)
        .bind(grade)
        .bind(feedback)
        .bind(graded_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("grade submission"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_detects_only_database_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn test_column_lists_match_models() {
        assert!(SUBMISSION_COLUMNS.contains("graded_by"));
        assert!(COURSE_COLUMNS.contains("teacher_id"));
        assert!(!COURSE_COLUMNS.contains("enrolled_students"));
    }
}
