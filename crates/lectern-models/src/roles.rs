//! The two account roles and the authenticated principal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::ids::UserId;

/// Account role. Roles are flat: a teacher is not a "bigger" student.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Student, Role::Teacher];

    /// Name used as the role key in the permission table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Role must be student or teacher, got '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated caller of a request.
///
/// Produced by the authentication provider from a verified token and never
/// persisted. It is immutable for the lifetime of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn student(id: UserId) -> Self {
        Self::new(id, Role::Student)
    }

    pub fn teacher(id: UserId) -> Self {
        Self::new(id, Role::Teacher)
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("admin".to_string()));
        assert!(err.to_string().contains("student or teacher"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), r#""teacher""#);
    }

    #[test]
    fn test_principal_role_helpers() {
        let id = UserId::new();
        assert!(Principal::student(id).is_student());
        assert!(!Principal::student(id).is_teacher());
        assert!(Principal::teacher(id).is_teacher());
    }
}
