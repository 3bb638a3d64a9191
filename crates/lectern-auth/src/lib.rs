//! # Lectern Auth
//!
//! The authentication provider for the Lectern API: it turns a bearer
//! credential into a [`Principal`](lectern_models::Principal) carrying the
//! caller's identity and role. Authorization decisions are made elsewhere
//! (`lectern-rbac`); this crate only answers "who is calling".
//!
//! - [`claims`]: JWT claim structure
//! - [`jwt`]: Token creation and verification
//! - [`provider`]: The [`AuthenticationProvider`] seam and its JWT implementation
//!
//! # Example
//!
//! ```ignore
//! use lectern_auth::{AuthenticationProvider, JwtAuthenticator, create_access_token};
//! use lectern_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "t@lectern.test", Role::Teacher, &config)?;
//!
//! let principal = JwtAuthenticator::new(config).authenticate(&token)?;
//! assert!(principal.is_teacher());
//! ```

pub mod claims;
pub mod jwt;
pub mod provider;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use provider::{AuthenticationProvider, JwtAuthenticator};
