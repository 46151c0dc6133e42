//! Role gating for route groups.
//!
//! [`require_teacher`] and [`require_student`] are applied with
//! `route_layer` on the `/api/teacher` and `/api/student` groups. Handlers
//! additionally take a `RequireTeacher`/`RequireStudent` extractor, so a
//! route moved out of its group stays protected.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use rollcall_core::AppError;
use rollcall_models::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Fails with 403 unless the session's role is one of `allowed`.
pub fn check_role(auth_user: &AuthUser, allowed: &[UserRole]) -> Result<UserRole, AppError> {
    let role = auth_user.role()?;

    if !allowed.contains(&role) {
        let required = allowed
            .iter()
            .map(UserRole::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(AppError::forbidden(format!(
            "Access denied. This resource requires the {} role",
            required
        )));
    }

    Ok(role)
}

pub async fn require_roles(
    state: AppState,
    req: Request,
    next: Next,
    allowed: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_role(&auth_user, allowed)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(state, req, next, &[UserRole::Teacher])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(state, req, next, &[UserRole::Student])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_auth::Claims;

    fn auth_user(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_matching_role_passes() {
        let role = check_role(&auth_user("teacher"), &[UserRole::Teacher]).unwrap();
        assert_eq!(role, UserRole::Teacher);
    }

    #[test]
    fn test_other_role_is_forbidden() {
        let err = check_role(&auth_user("student"), &[UserRole::Teacher]).unwrap_err();
        assert_eq!(err.status().as_u16(), 403);
        assert!(err.message().contains("teacher"));
    }

    #[test]
    fn test_any_listed_role_passes() {
        let allowed = [UserRole::Teacher, UserRole::Student];
        assert!(check_role(&auth_user("student"), &allowed).is_ok());
    }
}
