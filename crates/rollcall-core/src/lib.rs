//! # Rollcall Core
//!
//! Core types, errors, and utilities for the Rollcall API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page/limit query parameters and response metadata
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Query-string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::{AppError, hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Stream not found"));
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::{AppError, format_validation_errors};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, hash_password_with_cost, verify_password};
