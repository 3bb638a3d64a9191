//! Authentication provider: credential in, [`Principal`] out.

use tracing::debug;

use lectern_config::JwtConfig;
use lectern_core::AppError;
use lectern_models::{Principal, UserId};

use crate::jwt::verify_token;

/// Verifies a credential and yields the authenticated principal.
pub trait AuthenticationProvider {
    fn authenticate(&self, credential: &str) -> Result<Principal, AppError>;
}

/// Accepts the bearer JWTs issued by [`create_access_token`](crate::create_access_token).
#[derive(Clone, Debug)]
pub struct JwtAuthenticator {
    config: JwtConfig,
}

impl JwtAuthenticator {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }
}

impl AuthenticationProvider for JwtAuthenticator {
    fn authenticate(&self, credential: &str) -> Result<Principal, AppError> {
        let claims = verify_token(credential, &self.config)?;

        let id: UserId = claims.sub.parse().map_err(|_| {
            debug!(sub = %claims.sub, "Token subject is not a user id");
            AppError::unauthorized("Invalid user ID in token".to_string())
        })?;

        Ok(Principal::new(id, claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Claims;
    use crate::jwt::create_access_token;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use lectern_models::Role;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "provider-test-secret-with-enough-length".to_string(),
            access_token_expiry: 600,
        }
    }

    #[test]
    fn test_authenticate_yields_principal() {
        let user_id = UserId::new();
        let token = create_access_token(user_id, "s@test.com", Role::Student, &config()).unwrap();

        let principal = JwtAuthenticator::new(config()).authenticate(&token).unwrap();

        assert_eq!(principal, Principal::student(user_id));
    }

    #[test]
    fn test_authenticate_rejects_non_uuid_subject() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            email: "x@test.com".to_string(),
            role: Role::Teacher,
            exp: now + 600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config().secret.as_bytes()),
        )
        .unwrap();

        let err = JwtAuthenticator::new(config()).authenticate(&token).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }
}
