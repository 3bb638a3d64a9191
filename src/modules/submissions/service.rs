use anyhow::anyhow;
use lectern_core::AppError;
use lectern_db::{Inserted, Store};
use lectern_models::{
    AssignmentId, CreateSubmissionDto, GradeSubmissionDto, Principal, Submission, SubmissionId,
    SubmissionListResponse, check_grade,
};
use lectern_rbac::{
    Check, Conflict, Missing, OwnershipVerifier, ResolveError, ResourceLookup, parse_id,
    resolve_assignment, resolve_submission,
};
use tracing::{info, instrument};

use crate::metrics;

pub struct SubmissionService;

fn listing(submissions: Vec<Submission>) -> SubmissionListResponse {
    SubmissionListResponse {
        count: submissions.len(),
        submissions,
    }
}

impl SubmissionService {
    #[instrument(skip(store, dto), fields(assignment.id = %dto.assignment_id))]
    pub async fn submit(
        store: &Store,
        principal: Principal,
        dto: CreateSubmissionDto,
    ) -> Result<Submission, AppError> {
        let assignment_id: AssignmentId =
            parse_id(&dto.assignment_id).map_err(Missing::into_app_error)?;
        let chain = resolve_assignment(store, assignment_id)
            .await
            .map_err(ResolveError::into_app_error)?;

        let prior = store
            .find_submission_for(chain.assignment.id, principal.id)
            .await?;

        OwnershipVerifier::verify(
            &principal,
            Check::SubmissionCreate {
                chain: &chain,
                prior: prior.as_ref(),
            },
        )
        .into_result()?;

        // The unique (assignment, student) key settles a race between two submits.
        let submission = match store
            .create_submission(chain.assignment.id, principal.id, dto.content)
            .await?
        {
            Inserted::Created(submission) => submission,
            Inserted::Duplicate => return Err(AppError::bad_request(Conflict::AlreadySubmitted)),
        };

        info!(
            submission.id = %submission.id,
            student.id = %principal.id,
            "Assignment submitted"
        );
        Ok(submission)
    }

    /// The caller's own submissions; with `graded_only`, just the graded ones.
    #[instrument(skip(store))]
    pub async fn list_own(
        store: &Store,
        principal: Principal,
        graded_only: bool,
    ) -> Result<SubmissionListResponse, AppError> {
        OwnershipVerifier::verify(
            &principal,
            Check::SubmissionListOwn {
                student: principal.id,
            },
        )
        .into_result()?;

        let submissions = store
            .list_submissions_by_student(principal.id, graded_only)
            .await?;
        Ok(listing(submissions))
    }

    #[instrument(skip(store))]
    pub async fn list_for_assignment(
        store: &Store,
        principal: Principal,
        assignment_id: AssignmentId,
    ) -> Result<SubmissionListResponse, AppError> {
        let chain = resolve_assignment(store, assignment_id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::SubmissionListForAssignment { chain: &chain })
            .into_result()?;

        let submissions = store.list_submissions_for_assignment(assignment_id).await?;
        Ok(listing(submissions))
    }

    /// The grade range is checked before the submission is looked up.
    #[instrument(skip(store, dto), fields(grade = dto.grade))]
    pub async fn grade(
        store: &Store,
        principal: Principal,
        id: SubmissionId,
        dto: GradeSubmissionDto,
    ) -> Result<Submission, AppError> {
        let grade = check_grade(dto.grade).map_err(AppError::bad_request)?;

        let chain = resolve_submission(store, id)
            .await
            .map_err(ResolveError::into_app_error)?;

        OwnershipVerifier::verify(&principal, Check::SubmissionGrade { chain: &chain })
            .into_result()?;

        let submission = store
            .grade_submission(id, grade, dto.feedback.unwrap_or_default(), principal.id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Submission not found")))?;

        metrics::track_submission_graded();
        info!(submission.id = %id, grader.id = %principal.id, grade, "Submission graded");
        Ok(submission)
    }
}
