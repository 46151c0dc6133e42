use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::AppError;
use rollcall_models::{
    EnrollStudentDto, StreamEnrollmentResponse, SubjectEnrollment, UnenrollResponse,
};

use crate::metrics::{track_enrollments, track_unenrollments};
use crate::middleware::auth::RequireTeacher;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

/// Enroll a student in every subject of a stream
#[utoipa::path(
    post,
    path = "/api/teacher/streams/{id}/enrollments",
    params(
        ("id" = Uuid, Path, description = "Stream ID")
    ),
    request_body = EnrollStudentDto,
    responses(
        (status = 201, description = "Student enrolled in the missing subjects", body = StreamEnrollmentResponse),
        (status = 400, description = "Validation error or stream has no subjects", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Stream belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Stream or student not found", body = ErrorResponse),
        (status = 409, description = "Student already holds every enrollment", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn enroll_in_stream(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<EnrollStudentDto>,
) -> Result<(StatusCode, Json<StreamEnrollmentResponse>), AppError> {
    let response =
        EnrollmentService::enroll_in_stream(&state.db, id, teacher.user_id, dto).await?;
    track_enrollments("stream", response.enrolled_count);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Remove a student from every subject of a stream
#[utoipa::path(
    delete,
    path = "/api/teacher/streams/{id}/enrollments/{student_id}",
    params(
        ("id" = Uuid, Path, description = "Stream ID"),
        ("student_id" = Uuid, Path, description = "Student user ID")
    ),
    responses(
        (status = 200, description = "Enrollments removed", body = UnenrollResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Stream belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Stream not found or student not enrolled", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn unenroll_from_stream(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath((id, student_id)): ValidatedPath<(Uuid, Uuid)>,
) -> Result<Json<UnenrollResponse>, AppError> {
    let response =
        EnrollmentService::unenroll_from_stream(&state.db, id, teacher.user_id, student_id)
            .await?;
    track_unenrollments("stream", response.removed_count);
    Ok(Json(response))
}

/// Enroll a student in one subject
#[utoipa::path(
    post,
    path = "/api/teacher/subjects/{id}/enrollments",
    params(
        ("id" = Uuid, Path, description = "Subject ID")
    ),
    request_body = EnrollStudentDto,
    responses(
        (status = 201, description = "Student enrolled", body = SubjectEnrollment),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Subject belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Subject or student not found", body = ErrorResponse),
        (status = 409, description = "Student already enrolled", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn enroll_in_subject(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<EnrollStudentDto>,
) -> Result<(StatusCode, Json<SubjectEnrollment>), AppError> {
    let enrollment =
        EnrollmentService::enroll_in_subject(&state.db, id, teacher.user_id, dto).await?;
    track_enrollments("subject", 1);
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Remove a student from one subject
#[utoipa::path(
    delete,
    path = "/api/teacher/subjects/{id}/enrollments/{student_id}",
    params(
        ("id" = Uuid, Path, description = "Subject ID"),
        ("student_id" = Uuid, Path, description = "Student user ID")
    ),
    responses(
        (status = 200, description = "Enrollment removed", body = UnenrollResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Subject belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Subject not found or student not enrolled", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, teacher), fields(teacher_id = %teacher.user_id))]
pub async fn unenroll_from_subject(
    State(state): State<AppState>,
    teacher: RequireTeacher,
    ValidatedPath((id, student_id)): ValidatedPath<(Uuid, Uuid)>,
) -> Result<Json<UnenrollResponse>, AppError> {
    let response =
        EnrollmentService::unenroll_from_subject(&state.db, id, teacher.user_id, student_id)
            .await?;
    track_unenrollments("subject", response.removed_count);
    Ok(Json(response))
}
