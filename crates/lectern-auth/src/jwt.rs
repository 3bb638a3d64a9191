//! JWT creation and verification.
//!
//! Tokens are HS256-signed with `JWT_SECRET` and carry the user id, email
//! and role (see [`Claims`]).

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use lectern_config::JwtConfig;
use lectern_core::AppError;
use lectern_models::{Role, UserId};

use crate::claims::Claims;

/// Creates an access token for the given user.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    user_id: UserId,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error for a bad signature, an expired token, or
/// a malformed token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}
