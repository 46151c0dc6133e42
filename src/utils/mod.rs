//! Shared helpers for the feature modules.
//!
//! - [`access`]: Ownership and enrollment checks

pub mod access;
