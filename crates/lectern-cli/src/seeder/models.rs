//! Data models for database seeding configuration.

use chrono::{DateTime, Utc};
use lectern_models::{CourseId, Role, UserId};

/// Seed data for creating a user.
pub struct UserSeed {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Seed data for creating a course.
pub struct CourseSeed {
    pub title: String,
    pub description: String,
    pub content: String,
    pub teacher_id: UserId,
}

/// Seed data for creating an assignment.
pub struct AssignmentSeed {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub max_score: i32,
}

/// Complete configuration for database seeding.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    pub courses: usize,
    pub assignments_per_course: usize,
    /// Probability that a given student is enrolled in a given course.
    pub enrollment_rate: f64,
    /// Shared by every seeded account.
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 5,
            students: 100,
            courses: 10,
            assignments_per_course: 3,
            enrollment_rate: 0.3,
            password: "password123".to_string(),
        }
    }
}

impl SeedConfig {
    pub fn new(teachers: usize, students: usize, courses: usize) -> Self {
        Self {
            teachers,
            students,
            courses,
            ..Default::default()
        }
    }

    pub fn with_assignments(mut self, per_course: usize) -> Self {
        self.assignments_per_course = per_course;
        self
    }

    pub fn with_enrollment_rate(mut self, rate: f64) -> Self {
        self.enrollment_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn total_users(&self) -> usize {
        self.teachers + self.students
    }
}
