use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    get_my_attendance, get_my_stream_attendance, get_my_subject_attendance,
    get_subject_attendance, mark_attendance,
};

/// Routes mounted under `/api/teacher`.
pub fn init_teacher_attendance_router() -> Router<AppState> {
    Router::new().route(
        "/subjects/{id}/attendance",
        get(get_subject_attendance).post(mark_attendance),
    )
}

/// Routes mounted under `/api/student`.
pub fn init_student_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(get_my_attendance))
        .route("/subjects/{id}/attendance", get(get_my_subject_attendance))
        .route("/streams/{id}/attendance", get(get_my_stream_attendance))
}
