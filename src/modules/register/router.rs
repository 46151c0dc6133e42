use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{register_student, register_teacher};

pub fn init_register_router() -> Router<AppState> {
    Router::new()
        .route("/student", post(register_student))
        .route("/teacher", post(register_teacher))
}
