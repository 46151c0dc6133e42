//! Application error type with HTTP response conversion.
//!
//! Every failure in the API surfaces as an [`AppError`]: an HTTP status
//! paired with an [`anyhow::Error`] describing what went wrong. Handlers
//! return `Result<_, AppError>` and axum renders the error as
//! `{ "error": "<message>" }`.
//!
//! | Class | Status | Constructor |
//! |-------|--------|-------------|
//! | Validation | 400 | [`AppError::bad_request`] |
//! | Auth | 401 | [`AppError::unauthorized`] |
//! | Access | 403 | [`AppError::forbidden`] |
//! | Not found | 404 | [`AppError::not_found`] |
//! | Conflict | 409 | [`AppError::conflict`] |
//! | Internal | 500 | [`AppError::internal_error`], [`AppError::database`] |
//!
//! Internal errors are logged and replaced by a generic message in the
//! response body so driver details never reach clients.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow::anyhow!(message))
    }

    /// Wraps a database failure, classifying constraint violations.
    ///
    /// Works on errors that were given extra context with
    /// [`anyhow::Context`], since the underlying [`sqlx::Error`] is still
    /// reachable through downcasting.
    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        let error = err.into();
        let status = error
            .downcast_ref::<sqlx::Error>()
            .map(classify_sqlx_error)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        Self { status, error }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

fn classify_sqlx_error(err: &sqlx::Error) -> StatusCode {
    match err {
        sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StatusCode::CONFLICT,
        sqlx::Error::Database(db_err)
            if db_err.is_foreign_key_violation() || db_err.is_check_violation() =>
        {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Joins field-level validation failures into a single readable message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>();
    messages.sort();
    messages.join(", ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.error.to_string()
        };

        (self.status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::database(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::bad_request(anyhow::anyhow!(format_validation_errors(&errors)))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "name must be at least 3 characters"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_constructors_set_status() {
        assert_eq!(
            AppError::bad_request(anyhow::anyhow!("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unauthorized("x".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden("x".to_string()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::not_found(anyhow::anyhow!("x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict(anyhow::anyhow!("x")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::internal_error("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_context_keeps_sqlx_classification() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let err = result
            .context("Failed to fetch stream")
            .map_err(AppError::database)
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_sqlx_errors_are_internal() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        let sample = Sample {
            name: "ab".to_string(),
            email: "not-an-email".to_string(),
        };
        let err = AppError::from(sample.validate().unwrap_err());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let message = err.message();
        assert!(message.contains("name must be at least 3 characters"));
        assert!(message.contains("email is invalid"));
    }

    #[test]
    fn test_client_error_body_keeps_message() {
        let response = AppError::forbidden("Not your stream".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_server_error_response_status() {
        let response = AppError::internal_error("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
