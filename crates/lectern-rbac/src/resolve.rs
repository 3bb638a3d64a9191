//! Multi-hop resource resolution.
//!
//! Ownership of an assignment or submission is decided by the course at the
//! end of the chain (`submission -> assignment -> course -> teacher`). The
//! functions here walk that chain through a [`ResourceLookup`] and report the
//! first missing link as a typed [`Missing`], before any ownership check runs.

use axum::http::StatusCode;
use lectern_core::AppError;
use lectern_models::{
    Assignment, AssignmentId, Course, CourseId, Submission, SubmissionId, UserId,
};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use tracing::warn;

/// Read access to the entities ownership checks are decided on.
///
/// Implemented by the storage layer. Lookups return `Ok(None)` for a miss and
/// reserve `Err` for storage failures.
pub trait ResourceLookup: Send + Sync {
    fn find_course(
        &self,
        id: CourseId,
    ) -> impl Future<Output = Result<Option<Course>, AppError>> + Send;

    fn find_assignment(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<Assignment>, AppError>> + Send;

    fn find_submission(
        &self,
        id: SubmissionId,
    ) -> impl Future<Output = Result<Option<Submission>, AppError>> + Send;

    /// The submission a student made for an assignment, if any.
    fn find_submission_for(
        &self,
        assignment_id: AssignmentId,
        student_id: UserId,
    ) -> impl Future<Output = Result<Option<Submission>, AppError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Course,
    Assignment,
    Submission,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Course => "Course",
            Entity::Assignment => "Assignment",
            Entity::Submission => "Submission",
        })
    }
}

/// A link in an ownership chain that does not exist.
///
/// `hop` counts from the requested resource: `0` is the resource itself,
/// `1` its parent, and so on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found")]
pub struct Missing {
    pub entity: Entity,
    pub id: String,
    pub hop: usize,
}

impl Missing {
    fn at(entity: Entity, id: impl fmt::Display, hop: usize) -> Self {
        Self {
            entity,
            id: id.to_string(),
            hop,
        }
    }

    pub fn into_app_error(self) -> AppError {
        AppError::new(StatusCode::NOT_FOUND, self)
    }
}

/// An identifier that names the first link of an ownership chain.
pub trait ResourceId: FromStr + fmt::Display + Copy {
    const ENTITY: Entity;
}

impl ResourceId for CourseId {
    const ENTITY: Entity = Entity::Course;
}

impl ResourceId for AssignmentId {
    const ENTITY: Entity = Entity::Assignment;
}

impl ResourceId for SubmissionId {
    const ENTITY: Entity = Entity::Submission;
}

/// Parses a client-supplied id. Text that is not an id names no resource,
/// so it is reported as a miss at hop 0.
pub fn parse_id<I: ResourceId>(raw: &str) -> Result<I, Missing> {
    raw.trim()
        .parse()
        .map_err(|_| Missing::at(I::ENTITY, raw, 0))
}

#[derive(Debug)]
pub enum ResolveError {
    Missing(Missing),
    Store(AppError),
}

impl ResolveError {
    pub fn missing(&self) -> Option<&Missing> {
        match self {
            ResolveError::Missing(missing) => Some(missing),
            ResolveError::Store(_) => None,
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            ResolveError::Missing(missing) => missing.into_app_error(),
            ResolveError::Store(err) => err,
        }
    }
}

impl From<Missing> for ResolveError {
    fn from(missing: Missing) -> Self {
        ResolveError::Missing(missing)
    }
}

#[derive(Debug, Clone)]
pub struct AssignmentChain {
    pub assignment: Assignment,
    pub course: Course,
}

#[derive(Debug, Clone)]
pub struct SubmissionChain {
    pub submission: Submission,
    pub assignment: Assignment,
    pub course: Course,
}

pub async fn resolve_course<L: ResourceLookup>(
    lookup: &L,
    id: CourseId,
) -> Result<Course, ResolveError> {
    lookup
        .find_course(id)
        .await
        .map_err(ResolveError::Store)?
        .ok_or_else(|| Missing::at(Entity::Course, id, 0).into())
}

pub async fn resolve_assignment<L: ResourceLookup>(
    lookup: &L,
    id: AssignmentId,
) -> Result<AssignmentChain, ResolveError> {
    let assignment = lookup
        .find_assignment(id)
        .await
        .map_err(ResolveError::Store)?
        .ok_or_else(|| Missing::at(Entity::Assignment, id, 0))?;

    let course = parent_course(lookup, assignment.course_id, 1).await?;

    Ok(AssignmentChain { assignment, course })
}

pub async fn resolve_submission<L: ResourceLookup>(
    lookup: &L,
    id: SubmissionId,
) -> Result<SubmissionChain, ResolveError> {
    let submission = lookup
        .find_submission(id)
        .await
        .map_err(ResolveError::Store)?
        .ok_or_else(|| Missing::at(Entity::Submission, id, 0))?;

    let assignment = match lookup
        .find_assignment(submission.assignment_id)
        .await
        .map_err(ResolveError::Store)?
    {
        Some(assignment) => assignment,
        None => {
            warn!(
                submission_id = %submission.id,
                assignment_id = %submission.assignment_id,
                "Submission references a missing assignment"
            );
            return Err(Missing::at(Entity::Assignment, submission.assignment_id, 1).into());
        }
    };

    let course = parent_course(lookup, assignment.course_id, 2).await?;

    Ok(SubmissionChain {
        submission,
        assignment,
        course,
    })
}

async fn parent_course<L: ResourceLookup>(
    lookup: &L,
    course_id: CourseId,
    hop: usize,
) -> Result<Course, ResolveError> {
    match lookup
        .find_course(course_id)
        .await
        .map_err(ResolveError::Store)?
    {
        Some(course) => Ok(course),
        None => {
            warn!(%course_id, hop, "Ownership chain references a missing course");
            Err(Missing::at(Entity::Course, course_id, hop).into())
        }
    }
}
