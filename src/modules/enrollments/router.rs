use axum::{
    Router,
    routing::{delete, post},
};

use crate::state::AppState;

use super::controller::{
    enroll_in_stream, enroll_in_subject, unenroll_from_stream, unenroll_from_subject,
};

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/streams/{id}/enrollments", post(enroll_in_stream))
        .route(
            "/streams/{id}/enrollments/{student_id}",
            delete(unenroll_from_stream),
        )
        .route("/subjects/{id}/enrollments", post(enroll_in_subject))
        .route(
            "/subjects/{id}/enrollments/{student_id}",
            delete(unenroll_from_subject),
        )
}
