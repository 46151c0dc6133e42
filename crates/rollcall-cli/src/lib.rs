//! # Rollcall CLI
//!
//! Database seeding utilities for Rollcall testing and development.
//!
//! ## Usage
//!
//! ```ignore
//! use rollcall_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(4); // 4 teachers with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
