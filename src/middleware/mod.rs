//! Request extractors for authentication and role-level authorization.
//!
//! 1. Client sends `Authorization: Bearer <token>`.
//! 2. [`auth::AuthUser`] verifies the token and yields a `Principal`.
//! 3. A `Require*` extractor asks the access gate whether the principal's role
//!    may perform the route's `(module, action)`.
//! 4. The handler loads the resource and runs the ownership check.
//!
//! ```ignore
//! use crate::middleware::auth::RequireCourseUpdate;
//!
//! async fn update_course(
//!     RequireCourseUpdate(principal): RequireCourseUpdate,
//! ) -> impl IntoResponse {
//!     // only reached when `course.update` is allowed for the caller's role
//! }
//! ```

pub mod auth;
