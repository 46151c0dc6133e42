use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_my_streams, get_my_subjects, get_student_directory};

/// Routes mounted under `/api/student`.
pub fn init_student_router() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(get_my_subjects))
        .route("/streams", get(get_my_streams))
}

/// Routes mounted under `/api/teacher`.
pub fn init_student_directory_router() -> Router<AppState> {
    Router::new().route("/students", get(get_student_directory))
}
