use axum::{Json, extract::State};
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::AppError;
use rollcall_models::{
    AttendanceQuery, AttendanceReport, MarkAttendanceDto, MarkAttendanceResponse,
};

use crate::metrics::track_attendance_marked;
use crate::middleware::auth::{RequireStudent, RequireTeacher};
use crate::modules::attendance::service::AttendanceService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

/// Mark attendance for a subject on one date
///
/// Re-marking the same date updates the stored status.
#[utoipa::path(
    post,
    path = "/api/teacher/subjects/{id}/attendance",
    params(
        ("id" = Uuid, Path, description = "Subject ID")
    ),
    request_body = MarkAttendanceDto,
    responses(
        (status = 200, description = "Attendance recorded", body = MarkAttendanceResponse),
        (status = 400, description = "Validation error or duplicate student", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Subject belongs to another teacher or a student is not enrolled", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher, dto), fields(teacher_id = %teacher.user_id))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<MarkAttendanceDto>,
) -> Result<Json<MarkAttendanceResponse>, AppError> {
    let response = AttendanceService::mark_attendance(&state.db, id, teacher.user_id, dto).await?;
    track_attendance_marked(response.marked_count);
    Ok(Json(response))
}

/// Attendance records of a subject
#[utoipa::path(
    get,
    path = "/api/teacher/subjects/{id}/attendance",
    params(
        ("id" = Uuid, Path, description = "Subject ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Records and summary", body = AttendanceReport),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Subject belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn get_subject_attendance(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<AttendanceQuery>,
) -> Result<Json<AttendanceReport>, AppError> {
    let report =
        AttendanceService::subject_attendance(&state.db, id, teacher.user_id, query).await?;
    Ok(Json(report))
}

/// The caller's attendance across all subjects
#[utoipa::path(
    get,
    path = "/api/student/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Records and summary", body = AttendanceReport),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Student role required or subject not enrolled", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student), fields(student_id = %student.user_id))]
pub async fn get_my_attendance(
    State(state): State<AppState>,
    student: RequireStudent,
    ValidatedQuery(query): ValidatedQuery<AttendanceQuery>,
) -> Result<Json<AttendanceReport>, AppError> {
    let report = AttendanceService::student_attendance(&state.db, student.user_id, query).await?;
    Ok(Json(report))
}

/// The caller's attendance in one subject
#[utoipa::path(
    get,
    path = "/api/student/subjects/{id}/attendance",
    params(
        ("id" = Uuid, Path, description = "Subject ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Records and summary", body = AttendanceReport),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not enrolled in the subject", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student), fields(student_id = %student.user_id))]
pub async fn get_my_subject_attendance(
    State(state): State<AppState>,
    student: RequireStudent,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<AttendanceQuery>,
) -> Result<Json<AttendanceReport>, AppError> {
    let report =
        AttendanceService::student_subject_attendance(&state.db, student.user_id, id, query)
            .await?;
    Ok(Json(report))
}

/// The caller's attendance across a stream's subjects
#[utoipa::path(
    get,
    path = "/api/student/streams/{id}/attendance",
    params(
        ("id" = Uuid, Path, description = "Stream ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Records and summary", body = AttendanceReport),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "No enrollment in the stream", body = ErrorResponse),
        (status = 404, description = "Stream not found", body = ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student), fields(student_id = %student.user_id))]
pub async fn get_my_stream_attendance(
    State(state): State<AppState>,
    student: RequireStudent,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<AttendanceQuery>,
) -> Result<Json<AttendanceReport>, AppError> {
    let report =
        AttendanceService::student_stream_attendance(&state.db, student.user_id, id, query)
            .await?;
    Ok(Json(report))
}
