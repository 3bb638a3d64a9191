//! # Lectern RBAC
//!
//! The authorization core. A request passes two independent gates:
//!
//! 1. [`AccessGate::check`] asks the [`PermissionTable`] whether the caller's
//!    role may perform `(module, action)` at all.
//! 2. [`OwnershipVerifier::verify`] decides whether the caller is linked to
//!    the concrete resource, after [`resolve`] has loaded it.
//!
//! Lookup misses are reported by [`resolve`] before the second gate runs, so
//! a missing resource is always a 404 regardless of role.

pub mod gate;
pub mod ownership;
pub mod resolve;
pub mod table;

pub use gate::{AccessDenied, AccessGate};
pub use ownership::{Check, Conflict, OwnershipVerifier, Refusal, Relationship, Verdict};
pub use resolve::{
    AssignmentChain, Entity, Missing, ResolveError, ResourceId, ResourceLookup, SubmissionChain,
    parse_id, resolve_assignment, resolve_course, resolve_submission,
};
pub use table::{
    ActionRules, PermissionDecision, PermissionTable, PermissionTableError, RoleRules, TableSource,
};
