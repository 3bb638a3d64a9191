//! # Lectern DB
//!
//! Persistence for the Lectern API.
//!
//! [`Store`] is the single entry point handlers talk to. It is backed either
//! by PostgreSQL ([`PgStore`]) or, when no `DATABASE_URL` is configured, by a
//! process-local [`MemoryStore`]. Both backends enforce the same uniqueness
//! rules atomically: one enrollment per `(course, student)` and one
//! submission per `(assignment, student)`.
//!
//! # Example
//!
//! ```ignore
//! use lectern_db::{Store, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url).await?;
//! run_migrations(&pool).await?;
//! let store = Store::postgres(pool);
//! ```

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{init_db_pool, run_migrations};
pub use postgres::PgStore;
pub use store::{Inserted, NewAssignment, NewUser, Store};

// Re-export PgPool for convenience
pub use sqlx::PgPool;
