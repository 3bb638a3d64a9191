//! # Lectern CLI
//!
//! Operator tooling for the Lectern API.
//!
//! - [`permissions`]: Load a permission table and report every decision it makes
//! - [`seeder`]: Fill a development database with fake teachers, students,
//!   courses and assignments
//!
//! ## Usage
//!
//! ```ignore
//! use lectern_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(5, 100, 10);
//! seed_all(&pool, config).await?;
//! ```

pub mod permissions;
pub mod seeder;
