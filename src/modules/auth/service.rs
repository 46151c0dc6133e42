use anyhow::Context;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use rollcall_auth::create_access_token;
use rollcall_config::JwtConfig;
use rollcall_core::{AppError, verify_password};
use rollcall_models::{LoginRequest, LoginResponse, UserRole};

use crate::metrics::{track_login_failure, track_login_success};
use crate::modules::users::service::UserService;

#[derive(FromRow)]
struct Credentials {
    id: Uuid,
    email: String,
    password: String,
    role: UserRole,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, email, password, role FROM users WHERE email = $1",
        )
        .bind(normalize_email(&dto.email))
        .fetch_optional(db)
        .await
        .context("Failed to fetch user credentials")
        .map_err(AppError::database)?;

        let Some(credentials) = credentials else {
            track_login_failure("unknown_email");
            return Err(invalid_credentials());
        };

        if !verify_password(&dto.password, &credentials.password)? {
            track_login_failure("wrong_password");
            return Err(invalid_credentials());
        }

        let access_token = create_access_token(
            credentials.id,
            &credentials.email,
            credentials.role.as_str(),
            jwt_config,
        )?;
        let user = UserService::get_profile(db, credentials.id).await?;

        track_login_success(credentials.role.as_str());

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user,
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid email or password".to_string())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
