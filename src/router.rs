use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::{require_student, require_teacher};
use crate::modules::attendance::{init_student_attendance_router, init_teacher_attendance_router};
use crate::modules::auth::init_auth_router;
use crate::modules::enrollments::init_enrollments_router;
use crate::modules::health::init_health_router;
use crate::modules::register::init_register_router;
use crate::modules::streams::init_streams_router;
use crate::modules::students::{init_student_directory_router, init_student_router};
use crate::modules::users::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let teacher_routes = Router::new()
        .merge(init_streams_router())
        .merge(init_enrollments_router())
        .merge(init_teacher_attendance_router())
        .merge(init_student_directory_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_teacher,
        ));

    let student_routes = Router::new()
        .merge(init_student_router())
        .merge(init_student_attendance_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_student,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest(
            "/api",
            Router::new()
                .nest("/register", init_register_router())
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router())
                .nest("/teacher", teacher_routes)
                .nest("/student", student_routes),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config.allowed_origins))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
