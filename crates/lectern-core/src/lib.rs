//! # Lectern Core
//!
//! Core types and utilities shared by every Lectern crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use lectern_core::errors::AppError;
//! use lectern_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{hash_password, verify_password};
