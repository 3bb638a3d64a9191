use anyhow::anyhow;
use lectern_core::AppError;
use lectern_db::{NewAssignment, Store};
use lectern_models::{
    Assignment, AssignmentId, AssignmentListResponse, CourseId, CreateAssignmentDto,
    DEFAULT_MAX_SCORE, Principal, Role, UpdateAssignmentDto,
};
use lectern_rbac::{
    Check, Missing, OwnershipVerifier, ResolveError, parse_id, resolve_assignment,
    resolve_course,
};
use tracing::{info, instrument};

pub struct AssignmentService;

impl AssignmentService {
    /// Assignments from every course the caller attends or teaches, soonest due first.
    #[instrument(skip(store))]
    pub async fn list_assignments(
        store: &Store,
        principal: Principal,
    ) -> Result<AssignmentListResponse, AppError> {
        let courses = match principal.role {
            Role::Student => store.list_courses_attended_by(principal.id).await?,
            Role::Teacher => store.list_courses_taught_by(principal.id).await?,
        };
        let course_ids: Vec<CourseId> = courses.iter().map(|c| c.id).collect();

        let assignments = store.list_assignments_for_courses(&course_ids).await?;

        Ok(AssignmentListResponse {
            count: assignments.len(),
            assignments,
        })
    }

    #[instrument(skip(store))]
    pub async fn get_assignment(
        store: &Store,
        principal: Principal,
        id: AssignmentId,
    ) -> Result<Assignment, AppError> {
        let chain = resolve_assignment(store, id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::AssignmentView { chain: &chain })
            .into_result()?;

        Ok(chain.assignment)
    }

    #[instrument(skip(store, dto), fields(course.id = %dto.course_id))]
    pub async fn create_assignment(
        store: &Store,
        principal: Principal,
        dto: CreateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let course_id: CourseId = parse_id(&dto.course_id).map_err(Missing::into_app_error)?;
        let course = resolve_course(store, course_id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::AssignmentCreate { course: &course })
            .into_result()?;

        let assignment = store
            .create_assignment(NewAssignment {
                course_id: course.id,
                title: dto.title,
                description: dto.description,
                due_date: dto.due_date,
                max_score: dto.max_score.unwrap_or(DEFAULT_MAX_SCORE),
            })
            .await?;

        info!(assignment.id = %assignment.id, course.id = %course.id, "Assignment created");
        Ok(assignment)
    }

    #[instrument(skip(store, dto))]
    pub async fn update_assignment(
        store: &Store,
        principal: Principal,
        id: AssignmentId,
        dto: UpdateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let chain = resolve_assignment(store, id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::AssignmentUpdate { chain: &chain })
            .into_result()?;

        store
            .update_assignment(id, dto)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Assignment not found")))
    }
}
