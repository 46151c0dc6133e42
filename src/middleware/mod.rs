//! Authentication extractors and role gating.
//!
//! - [`auth`]: `AuthUser` plus the `RequireTeacher`/`RequireStudent` extractors
//! - [`role`]: Router-level role middleware
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireTeacher;
//!
//! async fn list_streams(teacher: RequireTeacher) -> impl IntoResponse {
//!     // Only executes for a valid teacher session
//!     StreamService::list(&db, teacher.user_id).await
//! }
//! ```

pub mod auth;
pub mod role;
