//! Resource-level authorization.
//!
//! The permission table can say "teachers may grade"; it cannot say "a
//! teacher may only grade submissions from their own course". Those rules
//! live here as one predicate per relationship, applied after the
//! [`AccessGate`](crate::AccessGate) has passed and after the resources have
//! been resolved.
//!
//! A [`Verdict`] has three outcomes. `Conflict` covers state the caller asked
//! to create twice (enrolling again, submitting again); it is a validation
//! fault, not a denial.

use axum::http::StatusCode;
use lectern_core::AppError;
use lectern_models::{Course, Principal, Role, Submission, UserId};
use metrics::counter;
use tracing::debug;

use crate::resolve::{AssignmentChain, SubmissionChain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    CourseView,
    CourseUpdate,
    CourseManageStudents,
    CourseEnroll,
    AssignmentView,
    AssignmentCreate,
    AssignmentUpdate,
    SubmissionCreate,
    SubmissionListOwn,
    SubmissionListForAssignment,
    SubmissionGrade,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::CourseView => "course_view",
            Relationship::CourseUpdate => "course_update",
            Relationship::CourseManageStudents => "course_manage_students",
            Relationship::CourseEnroll => "course_enroll",
            Relationship::AssignmentView => "assignment_view",
            Relationship::AssignmentCreate => "assignment_create",
            Relationship::AssignmentUpdate => "assignment_update",
            Relationship::SubmissionCreate => "submission_create",
            Relationship::SubmissionListOwn => "submission_list_own",
            Relationship::SubmissionListForAssignment => "submission_list_for_assignment",
            Relationship::SubmissionGrade => "submission_grade",
        }
    }
}

/// A relationship together with the resources it is decided on.
#[derive(Debug, Clone, Copy)]
pub enum Check<'a> {
    CourseView { course: &'a Course },
    CourseUpdate { course: &'a Course },
    CourseAddStudent { course: &'a Course, student: UserId },
    CourseRemoveStudent { course: &'a Course },
    CourseEnroll { course: &'a Course },
    AssignmentView { chain: &'a AssignmentChain },
    /// The target course of a new assignment.
    AssignmentCreate { course: &'a Course },
    AssignmentUpdate { chain: &'a AssignmentChain },
    SubmissionCreate {
        chain: &'a AssignmentChain,
        prior: Option<&'a Submission>,
    },
    SubmissionListOwn { student: UserId },
    SubmissionListForAssignment { chain: &'a AssignmentChain },
    SubmissionGrade { chain: &'a SubmissionChain },
}

impl Check<'_> {
    pub fn relationship(&self) -> Relationship {
        match self {
            Check::CourseView { .. } => Relationship::CourseView,
            Check::CourseUpdate { .. } => Relationship::CourseUpdate,
            Check::CourseAddStudent { .. } | Check::CourseRemoveStudent { .. } => {
                Relationship::CourseManageStudents
            }
            Check::CourseEnroll { .. } => Relationship::CourseEnroll,
            Check::AssignmentView { .. } => Relationship::AssignmentView,
            Check::AssignmentCreate { .. } => Relationship::AssignmentCreate,
            Check::AssignmentUpdate { .. } => Relationship::AssignmentUpdate,
            Check::SubmissionCreate { .. } => Relationship::SubmissionCreate,
            Check::SubmissionListOwn { .. } => Relationship::SubmissionListOwn,
            Check::SubmissionListForAssignment { .. } => Relationship::SubmissionListForAssignment,
            Check::SubmissionGrade { .. } => Relationship::SubmissionGrade,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    #[error("Not enrolled in this course")]
    NotEnrolled,
    #[error("Can only view your own courses")]
    CourseNotOwnedForView,
    #[error("Can only update your own courses")]
    CourseNotOwnedForUpdate,
    #[error("Can only manage your own courses")]
    CourseNotOwnedForManage,
    #[error("Only students can enroll in courses")]
    EnrollRequiresStudent,
    #[error("Can only view assignments from your courses")]
    AssignmentNotOwnedForView,
    #[error("Can only create assignments for your courses")]
    AssignmentNotOwnedForCreate,
    #[error("Can only update assignments from your courses")]
    AssignmentNotOwnedForUpdate,
    #[error("Only students can submit assignments")]
    SubmitRequiresStudent,
    #[error("Can only view your own submissions")]
    SubmissionsOfAnotherStudent,
    #[error("Can only view submissions from your courses")]
    SubmissionsNotOwnedForView,
    #[error("Can only grade submissions from your courses")]
    SubmissionNotOwnedForGrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Conflict {
    #[error("Already enrolled")]
    AlreadyEnrolled,
    #[error("Student already enrolled")]
    StudentAlreadyEnrolled,
    #[error("Already submitted")]
    AlreadySubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authorized,
    Unauthorized(Refusal),
    Conflict(Conflict),
}

impl Verdict {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Verdict::Authorized)
    }

    fn outcome(&self) -> &'static str {
        match self {
            Verdict::Authorized => "authorized",
            Verdict::Unauthorized(_) => "unauthorized",
            Verdict::Conflict(_) => "conflict",
        }
    }

    /// `Unauthorized` becomes 403, `Conflict` becomes 400.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Verdict::Authorized => Ok(()),
            Verdict::Unauthorized(refusal) => Err(AppError::new(StatusCode::FORBIDDEN, refusal)),
            Verdict::Conflict(conflict) => Err(AppError::new(StatusCode::BAD_REQUEST, conflict)),
        }
    }
}

pub struct OwnershipVerifier;

impl OwnershipVerifier {
    pub fn verify(principal: &Principal, check: Check<'_>) -> Verdict {
        let verdict = Self::decide(principal, check);
        let relationship = check.relationship();

        counter!(
            "ownership_checks_total",
            "relationship" => relationship.as_str(),
            "outcome" => verdict.outcome()
        )
        .increment(1);

        debug!(
            user_id = %principal.id,
            role = %principal.role,
            relationship = relationship.as_str(),
            verdict = ?verdict,
            "Ownership check"
        );

        verdict
    }

    fn decide(principal: &Principal, check: Check<'_>) -> Verdict {
        match check {
            Check::CourseView { course } => {
                view_course(principal, course, Refusal::CourseNotOwnedForView)
            }
            Check::CourseUpdate { course } => {
                own_course(principal, course, Refusal::CourseNotOwnedForUpdate)
            }
            Check::CourseAddStudent { course, student } => {
                match own_course(principal, course, Refusal::CourseNotOwnedForManage) {
                    Verdict::Authorized if course.has_student(&student) => {
                        Verdict::Conflict(Conflict::StudentAlreadyEnrolled)
                    }
                    verdict => verdict,
                }
            }
            Check::CourseRemoveStudent { course } => {
                own_course(principal, course, Refusal::CourseNotOwnedForManage)
            }
            Check::CourseEnroll { course } => {
                if !principal.is_student() {
                    Verdict::Unauthorized(Refusal::EnrollRequiresStudent)
                } else if course.has_student(&principal.id) {
                    Verdict::Conflict(Conflict::AlreadyEnrolled)
                } else {
                    Verdict::Authorized
                }
            }
            Check::AssignmentView { chain } => {
                view_course(principal, &chain.course, Refusal::AssignmentNotOwnedForView)
            }
            Check::AssignmentCreate { course } => {
                own_course(principal, course, Refusal::AssignmentNotOwnedForCreate)
            }
            Check::AssignmentUpdate { chain } => {
                own_course(principal, &chain.course, Refusal::AssignmentNotOwnedForUpdate)
            }
            Check::SubmissionCreate { chain, prior } => {
                if !principal.is_student() {
                    Verdict::Unauthorized(Refusal::SubmitRequiresStudent)
                } else if !chain.course.has_student(&principal.id) {
                    Verdict::Unauthorized(Refusal::NotEnrolled)
                } else if prior.is_some() {
                    Verdict::Conflict(Conflict::AlreadySubmitted)
                } else {
                    Verdict::Authorized
                }
            }
            Check::SubmissionListOwn { student } => {
                if principal.id == student {
                    Verdict::Authorized
                } else {
                    Verdict::Unauthorized(Refusal::SubmissionsOfAnotherStudent)
                }
            }
            Check::SubmissionListForAssignment { chain } => {
                own_course(principal, &chain.course, Refusal::SubmissionsNotOwnedForView)
            }
            Check::SubmissionGrade { chain } => {
                own_course(principal, &chain.course, Refusal::SubmissionNotOwnedForGrade)
            }
        }
    }
}

/// Students see courses they are enrolled in; teachers see courses they teach.
fn view_course(principal: &Principal, course: &Course, teacher_refusal: Refusal) -> Verdict {
    match principal.role {
        Role::Student if course.has_student(&principal.id) => Verdict::Authorized,
        Role::Student => Verdict::Unauthorized(Refusal::NotEnrolled),
        Role::Teacher if course.is_taught_by(&principal.id) => Verdict::Authorized,
        Role::Teacher => Verdict::Unauthorized(teacher_refusal),
    }
}

fn own_course(principal: &Principal, course: &Course, refusal: Refusal) -> Verdict {
    if principal.is_teacher() && course.is_taught_by(&principal.id) {
        Verdict::Authorized
    } else {
        Verdict::Unauthorized(refusal)
    }
}
