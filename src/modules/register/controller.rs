use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use rollcall_core::AppError;
use rollcall_models::{RegisterStudentDto, RegisterTeacherDto, UserProfile, UserRole};

use crate::metrics::track_registration;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::RegistrationService;

/// Register a student account
#[utoipa::path(
    post,
    path = "/api/register/student",
    request_body = RegisterStudentDto,
    responses(
        (status = 201, description = "Student registered", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email or registration number already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Registration"
)]
#[instrument(skip(state, dto))]
pub async fn register_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterStudentDto>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let profile = RegistrationService::register_student(&state.db, dto).await?;
    track_registration(UserRole::Student.as_str());
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Register a teacher account
#[utoipa::path(
    post,
    path = "/api/register/teacher",
    request_body = RegisterTeacherDto,
    responses(
        (status = 201, description = "Teacher registered", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Registration"
)]
#[instrument(skip(state, dto))]
pub async fn register_teacher(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterTeacherDto>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let profile = RegistrationService::register_teacher(&state.db, dto).await?;
    track_registration(UserRole::Teacher.as_str());
    Ok((StatusCode::CREATED, Json(profile)))
}
