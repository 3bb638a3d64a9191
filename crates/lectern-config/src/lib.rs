//! # Lectern Config
//!
//! Configuration types for the Lectern API, loaded from environment variables:
//!
//! - [`jwt`]: JWT authentication configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`permissions`]: Where the permission table is loaded from
//! - [`server`]: Bind address and storage selection
//!
//! # Example
//!
//! ```ignore
//! use lectern_config::{CorsConfig, JwtConfig, PermissionsConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let permissions_config = PermissionsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod permissions;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use permissions::PermissionsConfig;
pub use server::ServerConfig;
