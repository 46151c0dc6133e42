use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_stream, create_subject, get_stream, list_stream_students, list_streams, list_subjects,
};

pub fn init_streams_router() -> Router<AppState> {
    Router::new()
        .route("/streams", get(list_streams).post(create_stream))
        .route("/streams/{id}", get(get_stream))
        .route(
            "/streams/{id}/subjects",
            get(list_subjects).post(create_subject),
        )
        .route("/streams/{id}/students", get(list_stream_students))
}
