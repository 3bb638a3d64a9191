//! # Lectern Models
//!
//! Domain entities and request/response DTOs for the Lectern API.
//!
//! - [`ids`]: Typed identifiers
//! - [`roles`]: `Role` and the authenticated `Principal`
//! - [`users`]: Accounts, registration and login payloads
//! - [`courses`]: Courses and enrollment rosters
//! - [`assignments`]: Assignments attached to a course
//! - [`submissions`]: Student submissions and grading

pub mod assignments;
pub mod courses;
pub mod ids;
pub mod roles;
pub mod submissions;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use assignments::{
    Assignment, AssignmentListResponse, CreateAssignmentDto, DEFAULT_MAX_SCORE,
    UpdateAssignmentDto,
};
pub use courses::{
    AddStudentDto, Course, CourseListResponse, CourseRow, CreateCourseDto, EnrollmentResponse,
    UpdateCourseDto,
};
pub use ids::{AssignmentId, CourseId, SubmissionId, UserId};
pub use roles::{Principal, Role, UnknownRole};
pub use submissions::{
    CreateSubmissionDto, GradeOutOfRange, GradeSubmissionDto, Submission,
    SubmissionListResponse, check_grade,
};
pub use users::{AuthResponse, LoginRequest, RegisterRequest, User, UserCredentials};
