//! Coarse, role-level authorization.
//!
//! The gate only answers "may this role perform this action in this module";
//! it never sees the concrete resource. Resource-level checks belong to
//! [`OwnershipVerifier`](crate::OwnershipVerifier).

use axum::http::StatusCode;
use lectern_core::AppError;
use lectern_models::Principal;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::table::{PermissionDecision, PermissionTable};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    /// The module has no entry in the table. This is a deployment defect,
    /// not something the caller did wrong.
    #[error("Module '{module}' not found in permissions.")]
    UnknownModule { module: String },
    #[error("Role '{role}' not configured for '{module}'.")]
    UnknownRole { module: String, role: String },
    #[error("Access denied. Role '{role}' cannot '{action}' in '{module}'.")]
    Explicit {
        module: String,
        role: String,
        action: String,
    },
}

impl AccessDenied {
    pub fn is_configuration_fault(&self) -> bool {
        matches!(self, AccessDenied::UnknownModule { .. })
    }

    pub fn status(&self) -> StatusCode {
        if self.is_configuration_fault() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::FORBIDDEN
        }
    }

    pub fn into_app_error(self) -> AppError {
        AppError::new(self.status(), self)
    }
}

/// Consults the shared [`PermissionTable`] for a principal's role.
#[derive(Debug, Clone)]
pub struct AccessGate {
    table: Arc<PermissionTable>,
}

impl AccessGate {
    pub fn new(table: PermissionTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    pub fn check(
        &self,
        principal: &Principal,
        module: &str,
        action: &str,
    ) -> Result<(), AccessDenied> {
        let role = principal.role.as_str();
        let decision = self.table.allows(module, role, action);

        counter!(
            "authorization_checks_total",
            "module" => module.to_owned(),
            "role" => role,
            "outcome" => decision.as_str()
        )
        .increment(1);

        match decision {
            PermissionDecision::Allowed => {
                debug!(user_id = %principal.id, module, role, action, "Access granted");
                Ok(())
            }
            PermissionDecision::DeniedUnknownModule => {
                error!(module, role, action, "Permission table has no entry for module");
                Err(AccessDenied::UnknownModule {
                    module: module.to_owned(),
                })
            }
            PermissionDecision::DeniedUnknownRole => {
                warn!(user_id = %principal.id, module, role, action, "Role not configured for module");
                Err(AccessDenied::UnknownRole {
                    module: module.to_owned(),
                    role: role.to_owned(),
                })
            }
            PermissionDecision::DeniedExplicit => {
                debug!(user_id = %principal.id, module, role, action, "Access denied");
                Err(AccessDenied::Explicit {
                    module: module.to_owned(),
                    role: role.to_owned(),
                    action: action.to_owned(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_models::UserId;

    fn gate() -> AccessGate {
        let table = PermissionTable::load(
            r#"{
                "course": {
                    "teacher": {"create": true, "view": true},
                    "student": {"view": true, "enroll": true, "create": false}
                },
                "submission": {
                    "student": {"create": true}
                }
            }"#,
        )
        .unwrap();
        AccessGate::new(table)
    }

    #[test]
    fn test_allowed() {
        let teacher = Principal::teacher(UserId::new());
        assert!(gate().check(&teacher, "course", "create").is_ok());
    }

    #[test]
    fn test_explicit_false_is_forbidden() {
        let student = Principal::student(UserId::new());
        let err = gate().check(&student, "course", "create").unwrap_err();
        assert_eq!(
            err,
            AccessDenied::Explicit {
                module: "course".into(),
                role: "student".into(),
                action: "create".into(),
            }
        );
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            err.to_string(),
            "Access denied. Role 'student' cannot 'create' in 'course'."
        );
    }

    #[test]
    fn test_absent_action_is_explicit_denial() {
        let teacher = Principal::teacher(UserId::new());
        let err = gate().check(&teacher, "course", "enroll").unwrap_err();
        assert!(matches!(err, AccessDenied::Explicit { .. }));
    }

    #[test]
    fn test_unknown_role_is_forbidden() {
        let teacher = Principal::teacher(UserId::new());
        let err = gate().check(&teacher, "submission", "create").unwrap_err();
        assert!(matches!(err, AccessDenied::UnknownRole { .. }));
        assert!(!err.is_configuration_fault());
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unknown_module_is_a_server_fault() {
        let student = Principal::student(UserId::new());
        let err = gate().check(&student, "gradebook", "view").unwrap_err();
        assert!(err.is_configuration_fault());

        let app_error = err.into_app_error();
        assert_eq!(app_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            app_error.message(),
            "Module 'gradebook' not found in permissions."
        );
    }

    #[test]
    fn test_decision_does_not_depend_on_identity() {
        let gate = gate();
        for _ in 0..5 {
            let student = Principal::student(UserId::new());
            assert!(gate.check(&student, "course", "enroll").is_ok());
        }
    }

    #[test]
    fn test_builtin_table_matches_documented_defaults() {
        let gate = AccessGate::new(PermissionTable::builtin().unwrap());
        let teacher = Principal::teacher(UserId::new());
        let student = Principal::student(UserId::new());

        assert!(gate.check(&teacher, "submission", "grade").is_ok());
        assert!(gate.check(&student, "submission", "grade").is_err());
        assert!(gate.check(&student, "submission", "view_own").is_ok());
        assert!(gate.check(&teacher, "course", "enroll").is_err());
        assert!(gate.check(&student, "assignment", "create").is_err());
    }
}
