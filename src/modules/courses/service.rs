use anyhow::anyhow;
use lectern_core::AppError;
use lectern_db::{Inserted, Store};
use lectern_models::{
    Course, CourseId, CourseListResponse, CreateCourseDto, EnrollmentResponse, Principal, Role,
    UpdateCourseDto, UserId,
};
use lectern_rbac::{Check, Conflict, OwnershipVerifier, ResolveError, resolve_course};
use tracing::{info, instrument};

pub struct CourseService;

fn course_gone() -> AppError {
    AppError::not_found(anyhow!("Course not found"))
}

impl CourseService {
    /// Students see the courses they attend, teachers the courses they teach.
    #[instrument(skip(store))]
    pub async fn list_courses(
        store: &Store,
        principal: Principal,
    ) -> Result<CourseListResponse, AppError> {
        let courses = match principal.role {
            Role::Student => store.list_courses_attended_by(principal.id).await?,
            Role::Teacher => store.list_courses_taught_by(principal.id).await?,
        };

        Ok(CourseListResponse {
            count: courses.len(),
            courses,
        })
    }

    #[instrument(skip(store))]
    pub async fn get_course(
        store: &Store,
        principal: Principal,
        id: CourseId,
    ) -> Result<Course, AppError> {
        let course = resolve_course(store, id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::CourseView { course: &course })
            .into_result()?;

        Ok(course)
    }

    #[instrument(skip(store, dto), fields(course.title = %dto.title))]
    pub async fn create_course(
        store: &Store,
        principal: Principal,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let course = store
            .create_course(principal.id, dto.title, dto.description, dto.content)
            .await?;

        info!(course.id = %course.id, teacher.id = %principal.id, "Course created");
        Ok(course)
    }

    #[instrument(skip(store, dto))]
    pub async fn update_course(
        store: &Store,
        principal: Principal,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let course = resolve_course(store, id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::CourseUpdate { course: &course })
            .into_result()?;

        store.update_course(id, dto).await?.ok_or_else(course_gone)
    }

    #[instrument(skip(store))]
    pub async fn enroll(
        store: &Store,
        principal: Principal,
        id: CourseId,
    ) -> Result<EnrollmentResponse, AppError> {
        let course = resolve_course(store, id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::CourseEnroll { course: &course })
            .into_result()?;

        // A concurrent enroll can still win the race.
        let course = match store.enroll_student(id, principal.id).await? {
            Inserted::Created(course) => course,
            Inserted::Duplicate => {
                return Err(AppError::bad_request(Conflict::AlreadyEnrolled));
            }
        };

        info!(course.id = %id, student.id = %principal.id, "Student enrolled");
        Ok(EnrollmentResponse {
            message: "Enrolled successfully".to_string(),
            course,
        })
    }

    #[instrument(skip(store))]
    pub async fn add_student(
        store: &Store,
        principal: Principal,
        id: CourseId,
        student_id: UserId,
    ) -> Result<EnrollmentResponse, AppError> {
        let course = resolve_course(store, id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(
            &principal,
            Check::CourseAddStudent {
                course: &course,
                student: student_id,
            },
        )
        .into_result()?;

        let student = store
            .find_user(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;
        if student.role != Role::Student {
            return Err(AppError::bad_request(anyhow!(
                "Only students can be enrolled in courses"
            )));
        }

        let course = match store.enroll_student(id, student_id).await? {
            Inserted::Created(course) => course,
            Inserted::Duplicate => {
                return Err(AppError::bad_request(Conflict::StudentAlreadyEnrolled));
            }
        };

        info!(course.id = %id, student.id = %student_id, "Student added to course");
        Ok(EnrollmentResponse {
            message: "Student added".to_string(),
            course,
        })
    }

    #[instrument(skip(store))]
    pub async fn remove_student(
        store: &Store,
        principal: Principal,
        id: CourseId,
        student_id: UserId,
    ) -> Result<EnrollmentResponse, AppError> {
        let course = resolve_course(store, id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::CourseRemoveStudent { course: &course })
            .into_result()?;

        let course = store
            .unenroll_student(id, student_id)
            .await?
            .ok_or_else(course_gone)?;

        info!(course.id = %id, student.id = %student_id, "Student removed from course");
        Ok(EnrollmentResponse {
            message: "Student removed".to_string(),
            course,
        })
    }
}
