//! In-memory backend.
//!
//! Used when no database is configured and by the integration tests. State is
//! lost on restart. All tables sit behind one `tokio::sync::RwLock`, so a
//! uniqueness check and the insert it guards happen under the same write lock.

use chrono::Utc;
use lectern_core::AppError;
use lectern_models::{
    Assignment, AssignmentId, Course, CourseId, Submission, SubmissionId, UpdateAssignmentDto,
    UpdateCourseDto, User, UserCredentials, UserId,
};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use crate::store::{Inserted, NewAssignment, NewUser};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, UserCredentials>,
    courses: HashMap<CourseId, Course>,
    assignments: HashMap<AssignmentId, Assignment>,
    submissions: HashMap<SubmissionId, Submission>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> chrono::DateTime<Utc>) {
    items.sort_by_key(|item| Reverse(key(item)));
}

impl MemoryStore {
    #[instrument(skip(self, user))]
    pub async fn create_user(&self, user: NewUser) -> Result<Inserted<User>, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            warn!(user.email = %user.email, "Email already registered");
            return Ok(Inserted::Duplicate);
        }

        let now = Utc::now();
        let credentials = UserCredentials {
            id: UserId::new(),
            name: user.name,
            email: user.email,
            role: user.role,
            password: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(credentials.id, credentials.clone());
        Ok(Inserted::Created(credentials.into_user()))
    }

    pub async fn find_user(&self, id: UserId) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned().map(UserCredentials::into_user))
    }

    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self, title, description, content))]
    pub async fn create_course(
        &self,
        teacher_id: UserId,
        title: String,
        description: Option<String>,
        content: Option<String>,
    ) -> Result<Course, AppError> {
        let now = Utc::now();
        let course = Course {
            id: CourseId::new(),
            title,
            description,
            content,
            teacher_id,
            enrolled_students: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .courses
            .insert(course.id, course.clone());
        Ok(course)
    }

    pub async fn update_course(
        &self,
        id: CourseId,
        changes: UpdateCourseDto,
    ) -> Result<Option<Course>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            course.title = title;
        }
        if let Some(description) = changes.description {
            course.description = Some(description);
        }
        if let Some(content) = changes.content {
            course.content = Some(content);
        }
        course.updated_at = Utc::now();

        Ok(Some(course.clone()))
    }

    pub async fn find_course(&self, id: CourseId) -> Result<Option<Course>, AppError> {
        Ok(self.tables.read().await.courses.get(&id).cloned())
    }

    pub async fn list_courses_taught_by(&self, teacher_id: UserId) -> Result<Vec<Course>, AppError> {
        self.list_courses(|c| c.is_taught_by(&teacher_id)).await
    }

    pub async fn list_courses_attended_by(
        &self,
        student_id: UserId,
    ) -> Result<Vec<Course>, AppError> {
        self.list_courses(|c| c.has_student(&student_id)).await
    }

    async fn list_courses(&self, keep: impl Fn(&Course) -> bool) -> Result<Vec<Course>, AppError> {
        let tables = self.tables.read().await;
        let mut courses: Vec<Course> = tables.courses.values().filter(|&c| keep(c)).cloned().collect();
        newest_first(&mut courses, |c| c.created_at);
        Ok(courses)
    }

    #[instrument(skip(self))]
    pub async fn enroll_student(
        &self,
        course_id: CourseId,
        student_id: UserId,
    ) -> Result<Inserted<Course>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.get_mut(&course_id) else {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        };

        if !course.enrolled_students.insert(student_id) {
            warn!(%course_id, %student_id, "Student already enrolled");
            return Ok(Inserted::Duplicate);
        }
        course.updated_at = Utc::now();

        Ok(Inserted::Created(course.clone()))
    }

    #[instrument(skip(self))]
    pub async fn unenroll_student(
        &self,
        course_id: CourseId,
        student_id: UserId,
    ) -> Result<Option<Course>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.get_mut(&course_id) else {
            return Ok(None);
        };

        if course.enrolled_students.remove(&student_id) {
            course.updated_at = Utc::now();
        }

        Ok(Some(course.clone()))
    }

    pub async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment, AppError> {
        let now = Utc::now();
        let assignment = Assignment {
            id: AssignmentId::new(),
            course_id: assignment.course_id,
            title: assignment.title,
            description: assignment.description,
            due_date: assignment.due_date,
            max_score: assignment.max_score,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .assignments
            .insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    pub async fn update_assignment(
        &self,
        id: AssignmentId,
        changes: UpdateAssignmentDto,
    ) -> Result<Option<Assignment>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(assignment) = tables.assignments.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            assignment.title = title;
        }
        if let Some(description) = changes.description {
            assignment.description = description;
        }
        if let Some(due_date) = changes.due_date {
            assignment.due_date = due_date;
        }
        if let Some(max_score) = changes.max_score {
            assignment.max_score = max_score;
        }
        assignment.updated_at = Utc::now();

        Ok(Some(assignment.clone()))
    }

    pub async fn find_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, AppError> {
        Ok(self.tables.read().await.assignments.get(&id).cloned())
    }

    pub async fn list_assignments_for_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Assignment>, AppError> {
        let tables = self.tables.read().await;
        let mut assignments: Vec<Assignment> = tables
            .assignments
            .values()
            .filter(|a| course_ids.contains(&a.course_id))
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.due_date);
        Ok(assignments)
    }

    #[instrument(skip(self, content))]
    pub async fn create_submission(
        &self,
        assignment_id: AssignmentId,
        student_id: UserId,
        content: String,
    ) -> Result<Inserted<Submission>, AppError> {
        let mut tables = self.tables.write().await;
        let exists = tables
            .submissions
            .values()
            .any(|s| s.assignment_id == assignment_id && s.student_id == student_id);
        if exists {
            warn!(%assignment_id, %student_id, "Submission already exists");
            return Ok(Inserted::Duplicate);
        }

        let now = Utc::now();
        let submission = Submission {
            id: SubmissionId::new(),
            assignment_id,
            student_id,
            content,
            submitted_at: now,
            grade: None,
            feedback: None,
            graded_by: None,
            created_at: now,
            updated_at: now,
        };
        tables.submissions.insert(submission.id, submission.clone());
        Ok(Inserted::Created(submission))
    }

    pub async fn find_submission(&self, id: SubmissionId) -> Result<Option<Submission>, AppError> {
        Ok(self.tables.read().await.submissions.get(&id).cloned())
    }

    pub async fn find_submission_for(
        &self,
        assignment_id: AssignmentId,
        student_id: UserId,
    ) -> Result<Option<Submission>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .values()
            .find(|s| s.assignment_id == assignment_id && s.student_id == student_id)
            .cloned())
    }

    pub async fn list_submissions_by_student(
        &self,
        student_id: UserId,
        graded_only: bool,
    ) -> Result<Vec<Submission>, AppError> {
        self.list_submissions(|s| s.student_id == student_id && (!graded_only || s.is_graded()))
            .await
    }

    pub async fn list_submissions_for_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<Submission>, AppError> {
        self.list_submissions(|s| s.assignment_id == assignment_id)
            .await
    }

    async fn list_submissions(
        &self,
        keep: impl Fn(&Submission) -> bool,
    ) -> Result<Vec<Submission>, AppError> {
        let tables = self.tables.read().await;
        let mut submissions: Vec<Submission> =
            tables.submissions.values().filter(|&s| keep(s)).cloned().collect();
        newest_first(&mut submissions, |s| s.submitted_at);
        Ok(submissions)
    }

    #[instrument(skip(self, feedback))]
    pub async fn grade_submission(
        &self,
        id: SubmissionId,
        grade: f64,
        feedback: String,
        graded_by: UserId,
    ) -> Result<Option<Submission>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(submission) = tables.submissions.get_mut(&id) else {
            return Ok(None);
        };

        submission.grade = Some(grade);
        submission.feedback = Some(feedback);
        submission.graded_by = Some(graded_by);
        submission.updated_at = Utc::now();

        Ok(Some(submission.clone()))
    }
}
