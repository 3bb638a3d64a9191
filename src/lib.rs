//! # Lectern API
//!
//! A REST API for courses, assignments and graded submissions, built with
//! Rust, Axum, and PostgreSQL.
//!
//! ## Overview
//!
//! Two roles exist, `student` and `teacher`. Every protected request passes
//! two authorization layers:
//!
//! 1. **Access gate**: a role/action lookup in the permission table
//!    (`config/permissions.json`), evaluated by the route's extractor before
//!    the body is read.
//! 2. **Ownership verification**: a per-resource predicate ("this teacher
//!    owns the course this submission belongs to"), evaluated by the service
//!    after the resource chain has been resolved.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Bearer authentication and access-gate extractors
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Registration, login, current user
//! │   ├── courses/     # Courses and enrollment
//! │   ├── assignments/ # Assignments
//! │   └── submissions/ # Submissions and grading
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Tracing setup and request logging
//! ├── metrics.rs        # Prometheus recorder and HTTP metrics
//! ├── router.rs         # Route tree
//! ├── state.rs          # Shared application state
//! └── validator.rs      # JSON body extractor with validation
//!
//! crates/
//! ├── lectern-auth/     # JWT issue and verification
//! ├── lectern-cli/      # Operator CLI (permission checks, seeding)
//! ├── lectern-config/   # Environment configuration
//! ├── lectern-core/     # AppError and password hashing
//! ├── lectern-db/       # Postgres and in-memory stores
//! ├── lectern-models/   # Entities and DTOs
//! └── lectern-rbac/     # Permission table, access gate, ownership checks
//! ```
//!
//! Each feature module has the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Resolution, ownership checks and persistence
//! - `router.rs`: Axum router configuration

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use lectern_auth;
pub use lectern_config;
pub use lectern_core;
pub use lectern_db;
pub use lectern_models;
pub use lectern_rbac;
