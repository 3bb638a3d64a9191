//! Typed identifiers for users, courses, assignments and submissions.
//!
//! Ownership checks compare identifiers across entities (a course's teacher
//! against the caller, a submission's student against the caller). Keeping
//! each id its own type means a `CourseId` can never be compared with a
//! `UserId` by accident.
//!
//! ```ignore
//! use lectern_models::ids::{CourseId, UserId};
//!
//! let teacher = UserId::new();
//! let course = CourseId::new();
//! // teacher == course  // does not compile
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Defines a `Uuid` newtype usable as a path parameter, JSON field and
/// Postgres column.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[inline]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            #[inline]
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <Uuid as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <Uuid as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <Uuid as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <Uuid as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <Uuid as PgHasArrayType>::array_type_info()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Uuid::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies a registered user (teacher or student).
    UserId
);

define_id!(CourseId);

define_id!(AssignmentId);

define_id!(SubmissionId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(CourseId::new(), CourseId::new());
    }

    #[test]
    fn test_debug_names_the_entity() {
        let uuid = Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc);
        let debug = format!("{:?}", SubmissionId::from_uuid(uuid));
        assert_eq!(debug, "SubmissionId(12345678-1234-1234-1234-123456789abc)");
    }

    #[test]
    fn test_parse_rejects_non_uuid() {
        assert!("missing123".parse::<AssignmentId>().is_err());
    }

    #[test]
    fn test_json_is_a_bare_uuid_string() {
        let uuid = Uuid::from_u128(0xabc);
        let json = serde_json::to_string(&UserId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_inner(), uuid);
    }

    #[test]
    fn test_set_of_ids_has_no_duplicates() {
        let student = UserId::new();
        let mut enrolled = BTreeSet::new();
        assert!(enrolled.insert(student));
        assert!(!enrolled.insert(student));
        assert_eq!(enrolled.len(), 1);
    }
}
