use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use lectern_models::{
    AddStudentDto, Assignment, AssignmentListResponse, AuthResponse, Course, CourseListResponse,
    CreateAssignmentDto, CreateCourseDto, CreateSubmissionDto, EnrollmentResponse,
    GradeSubmissionDto, LoginRequest, RegisterRequest, Role, Submission, SubmissionListResponse,
    UpdateAssignmentDto, UpdateCourseDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::enroll,
        crate::modules::courses::controller::add_student,
        crate::modules::courses::controller::remove_student,
        crate::modules::assignments::controller::list_assignments,
        crate::modules::assignments::controller::get_assignment,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::submissions::controller::submit_assignment,
        crate::modules::submissions::controller::my_submissions,
        crate::modules::submissions::controller::my_grades,
        crate::modules::submissions::controller::list_for_assignment,
        crate::modules::submissions::controller::grade_submission,
    ),
    components(
        schemas(
            User,
            Role,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            AddStudentDto,
            CourseListResponse,
            EnrollmentResponse,
            Assignment,
            CreateAssignmentDto,
            UpdateAssignmentDto,
            AssignmentListResponse,
            Submission,
            CreateSubmissionDto,
            GradeSubmissionDto,
            SubmissionListResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Courses", description = "Courses and enrollment"),
        (name = "Assignments", description = "Assignments attached to a course"),
        (name = "Submissions", description = "Student submissions and grading")
    ),
    info(
        title = "Lectern API",
        version = "0.1.0",
        description = "Course, assignment and grading API built with Rust, Axum, and PostgreSQL, guarded by table-driven role permissions and per-resource ownership checks.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_module_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for prefix in [
            "/api/auth",
            "/api/courses",
            "/api/assignments",
            "/api/submissions",
        ] {
            assert!(
                paths.iter().any(|p| p.starts_with(prefix)),
                "no documented path under {prefix}"
            );
        }
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
