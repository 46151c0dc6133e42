//! User domain models and DTOs.
//!
//! Every account is a row in `users` with a [`UserRole`]; students and
//! teachers carry their extra fields in the `students` and `teachers`
//! tables keyed by the user id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use rollcall_core::PaginationMeta;

/// Role of an account. Stored as the Postgres enum `user_role`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserRole::Student),
            "teacher" => Ok(UserRole::Teacher),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A user account without its password hash.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Account profile including role-specific fields.
///
/// `registration_number` is only present for students; `mobile_number` is
/// present for both roles.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    pub mobile_number: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterStudentDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[schema(example = "Ada Obi")]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "ada@school.test")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "registration_number must be 1-50 characters"
    ))]
    #[schema(example = "STU-2024-001")]
    pub registration_number: String,
    #[validate(length(min = 5, max = 20, message = "mobile_number must be 5-20 characters"))]
    #[schema(example = "+2348012345678")]
    pub mobile_number: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterTeacherDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[schema(example = "Grace Hopper")]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "grace@school.test")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 5, max = 20, message = "mobile_number must be 5-20 characters"))]
    pub mobile_number: String,
}

/// Student entry in the teacher-facing directory.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub mobile_number: String,
}

/// One page of the student directory.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentDirectoryPage {
    pub data: Vec<StudentSummary>,
    pub meta: PaginationMeta,
}

/// Query parameters for the student directory.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentDirectoryParams {
    /// Exact registration number to look up
    pub registration_number: Option<String>,
}
