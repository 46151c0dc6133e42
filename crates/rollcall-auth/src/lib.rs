//! # Rollcall Auth
//!
//! Session token types and JWT utilities for the Rollcall API.
//!
//! - [`claims`]: JWT claim structure carried by access tokens
//! - [`jwt`]: Token creation and verification
//!
//! A session resolves to `(user_id, role)`. Both travel in the signed token
//! so role gating needs no database round-trip; ownership and enrollment
//! checks still go to the database.
//!
//! # Example
//!
//! ```ignore
//! use rollcall_auth::{create_access_token, verify_token};
//! use rollcall_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "teacher@school.test", "teacher", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, "teacher");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
