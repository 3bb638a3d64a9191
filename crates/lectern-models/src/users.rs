//! User accounts and authentication DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use crate::roles::Role;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A user row together with its bcrypt hash. Never serialized.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserCredentials {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Either `student` or `teacher`.
    pub role: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
