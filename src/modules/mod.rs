//! Feature modules. Each has a `controller` (HTTP handlers), a `service`
//! (queries and business rules) and a `router`.

pub mod attendance;
pub mod auth;
pub mod enrollments;
pub mod health;
pub mod register;
pub mod streams;
pub mod students;
pub mod users;
