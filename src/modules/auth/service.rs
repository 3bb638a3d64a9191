use anyhow::anyhow;
use lectern_config::JwtConfig;
use lectern_core::{AppError, hash_password, verify_password};
use lectern_db::{Inserted, NewUser, Store};
use lectern_models::{AuthResponse, LoginRequest, Principal, RegisterRequest, Role, User};
use tracing::{info, instrument, warn};

use crate::metrics;
use lectern_auth::create_access_token;

pub struct AuthService;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    #[instrument(skip(store, jwt_config, dto), fields(user.email = %dto.email))]
    pub async fn register(
        store: &Store,
        jwt_config: &JwtConfig,
        dto: RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        let role: Role = dto.role.parse().map_err(AppError::bad_request)?;

        let password_hash = hash_password(&dto.password)?;
        let new_user = NewUser {
            name: dto.name.trim().to_string(),
            email: normalize_email(&dto.email),
            password_hash,
            role,
        };

        let user = match store.create_user(new_user).await? {
            Inserted::Created(user) => user,
            Inserted::Duplicate => {
                return Err(AppError::bad_request(anyhow!("User already exists")));
            }
        };

        metrics::track_user_registered(role.as_str());
        info!(user.id = %user.id, user.role = %user.role, "User registered");

        let token = create_access_token(user.id, &user.email, user.role, jwt_config)?;
        Ok(AuthResponse { token, user })
    }

    #[instrument(skip(store, jwt_config, dto), fields(user.email = %dto.email))]
    pub async fn login(
        store: &Store,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid credentials".to_string());

        let Some(credentials) = store
            .find_credentials_by_email(&normalize_email(&dto.email))
            .await?
        else {
            metrics::track_login(false);
            warn!("Login attempt for unknown email");
            return Err(invalid());
        };

        if !verify_password(&dto.password, &credentials.password)? {
            metrics::track_login(false);
            warn!(user.id = %credentials.id, "Login attempt with wrong password");
            return Err(invalid());
        }

        metrics::track_login(true);
        let user = credentials.into_user();
        let token = create_access_token(user.id, &user.email, user.role, jwt_config)?;
        Ok(AuthResponse { token, user })
    }

    #[instrument(skip(store))]
    pub async fn current_user(store: &Store, principal: Principal) -> Result<User, AppError> {
        store
            .find_user(principal.id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "auth-service-test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    fn register_request(email: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Grace".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = Store::memory();
        let config = jwt_config();

        let registered =
            AuthService::register(&store, &config, register_request("Grace@Example.com", "teacher"))
                .await
                .unwrap();
        assert_eq!(registered.user.email, "grace@example.com");
        assert_eq!(registered.user.role, Role::Teacher);

        let logged_in = AuthService::login(
            &store,
            &config,
            LoginRequest {
                email: "grace@example.com".to_string(),
                password: "secret123".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let store = Store::memory();
        let err = AuthService::register(&store, &jwt_config(), register_request("a@b.com", "admin"))
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let store = Store::memory();
        let config = jwt_config();
        AuthService::register(&store, &config, register_request("dup@example.com", "student"))
            .await
            .unwrap();

        let err = AuthService::register(&store, &config, register_request("dup@example.com", "student"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "User already exists");
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let store = Store::memory();
        let config = jwt_config();
        AuthService::register(&store, &config, register_request("pw@example.com", "student"))
            .await
            .unwrap();

        let err = AuthService::login(
            &store,
            &config,
            LoginRequest {
                email: "pw@example.com".to_string(),
                password: "not-it".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Invalid credentials");
    }
}
