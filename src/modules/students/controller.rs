use axum::{Json, extract::State};
use tracing::instrument;

use rollcall_core::{AppError, PaginationParams};
use rollcall_models::{StudentDirectoryPage, StudentDirectoryParams, StudentStream, SubjectWithStream};

use crate::middleware::auth::{RequireStudent, RequireTeacher};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedQuery;

/// Subjects the caller is enrolled in
#[utoipa::path(
    get,
    path = "/api/student/subjects",
    responses(
        (status = 200, description = "Enrolled subjects with their stream", body = Vec<SubjectWithStream>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Student role required", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student), fields(student_id = %student.user_id))]
pub async fn get_my_subjects(
    State(state): State<AppState>,
    student: RequireStudent,
) -> Result<Json<Vec<SubjectWithStream>>, AppError> {
    let subjects = StudentService::enrolled_subjects(&state.db, student.user_id).await?;
    Ok(Json(subjects))
}

/// Streams the caller is enrolled in
#[utoipa::path(
    get,
    path = "/api/student/streams",
    responses(
        (status = 200, description = "Streams with at least one enrollment", body = Vec<StudentStream>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Student role required", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student), fields(student_id = %student.user_id))]
pub async fn get_my_streams(
    State(state): State<AppState>,
    student: RequireStudent,
) -> Result<Json<Vec<StudentStream>>, AppError> {
    let streams = StudentService::enrolled_streams(&state.db, student.user_id).await?;
    Ok(Json(streams))
}

/// Student directory for enrolment
#[utoipa::path(
    get,
    path = "/api/teacher/students",
    params(StudentDirectoryParams, PaginationParams),
    responses(
        (status = 200, description = "One page of registered students", body = StudentDirectoryPage),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Teacher role required", body = ErrorResponse)
    ),
    tag = "Streams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _teacher))]
pub async fn get_student_directory(
    State(state): State<AppState>,
    _teacher: RequireTeacher,
    ValidatedQuery(params): ValidatedQuery<StudentDirectoryParams>,
    ValidatedQuery(pagination): ValidatedQuery<PaginationParams>,
) -> Result<Json<StudentDirectoryPage>, AppError> {
    let page = StudentService::directory(&state.db, params, pagination).await?;
    Ok(Json(page))
}
