use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::AppError;
use rollcall_models::{
    CreateStreamDto, CreateSubjectDto, Stream, StreamStudent, StreamSummary, StreamWithSubjects,
    Subject,
};

use crate::middleware::auth::RequireTeacher;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::streams::service::StreamService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

/// List the caller's streams
#[utoipa::path(
    get,
    path = "/api/teacher/streams",
    responses(
        (status = 200, description = "Streams owned by the teacher", body = Vec<StreamSummary>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Teacher role required", body = ErrorResponse)
    ),
    tag = "Streams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn list_streams(
    State(state): State<AppState>,
    teacher: RequireTeacher,
) -> Result<Json<Vec<StreamSummary>>, AppError> {
    let streams = StreamService::list_streams(&state.db, teacher.user_id).await?;
    Ok(Json(streams))
}

/// Create a stream
#[utoipa::path(
    post,
    path = "/api/teacher/streams",
    request_body = CreateStreamDto,
    responses(
        (status = 201, description = "Stream created", body = Stream),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Teacher role required", body = ErrorResponse)
    ),
    tag = "Streams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn create_stream(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedJson(dto): ValidatedJson<CreateStreamDto>,
) -> Result<(StatusCode, Json<Stream>), AppError> {
    let stream = StreamService::create_stream(&state.db, teacher.user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(stream)))
}

/// Get a stream with its subjects
#[utoipa::path(
    get,
    path = "/api/teacher/streams/{id}",
    params(
        ("id" = Uuid, Path, description = "Stream ID")
    ),
    responses(
        (status = 200, description = "Stream details", body = StreamWithSubjects),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Stream belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Stream not found", body = ErrorResponse)
    ),
    tag = "Streams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn get_stream(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<StreamWithSubjects>, AppError> {
    let stream = StreamService::get_stream(&state.db, id, teacher.user_id).await?;
    Ok(Json(stream))
}

/// List the subjects of a stream
#[utoipa::path(
    get,
    path = "/api/teacher/streams/{id}/subjects",
    params(
        ("id" = Uuid, Path, description = "Stream ID")
    ),
    responses(
        (status = 200, description = "Subjects in the stream", body = Vec<Subject>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Stream belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Stream not found", body = ErrorResponse)
    ),
    tag = "Streams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn list_subjects(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = StreamService::list_subjects(&state.db, id, teacher.user_id).await?;
    Ok(Json(subjects))
}

/// Add a subject to a stream
#[utoipa::path(
    post,
    path = "/api/teacher/streams/{id}/subjects",
    params(
        ("id" = Uuid, Path, description = "Stream ID")
    ),
    request_body = CreateSubjectDto,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Stream belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Stream not found", body = ErrorResponse),
        (status = 409, description = "Subject name already used in this stream", body = ErrorResponse)
    ),
    tag = "Streams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn create_subject(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = StreamService::create_subject(&state.db, id, teacher.user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// List students enrolled in a stream with their attendance
#[utoipa::path(
    get,
    path = "/api/teacher/streams/{id}/students",
    params(
        ("id" = Uuid, Path, description = "Stream ID")
    ),
    responses(
        (status = 200, description = "Enrolled students", body = Vec<StreamStudent>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Stream belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Stream not found", body = ErrorResponse)
    ),
    tag = "Streams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn list_stream_students(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Vec<StreamStudent>>, AppError> {
    let students = StreamService::list_students(&state.db, id, teacher.user_id).await?;
    Ok(Json(students))
}
