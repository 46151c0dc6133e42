use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::{AppError, hash_password};
use rollcall_models::{RegisterStudentDto, RegisterTeacherDto, UserProfile, UserRole};

use crate::modules::auth::service::normalize_email;
use crate::modules::users::service::UserService;

pub struct RegistrationService;

impl RegistrationService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_student(
        db: &PgPool,
        dto: RegisterStudentDto,
    ) -> Result<UserProfile, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO users (name, email, password, role)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.name.trim())
        .bind(normalize_email(&dto.email))
        .bind(&hashed_password)
        .bind(UserRole::Student)
        .fetch_one(&mut *tx)
        .await
        .map_err(registration_error)?;

        sqlx::query(
            r#"INSERT INTO students (user_id, registration_number, mobile_number)
               VALUES ($1, $2, $3)"#,
        )
        .bind(user_id)
        .bind(dto.registration_number.trim())
        .bind(dto.mobile_number.trim())
        .execute(&mut *tx)
        .await
        .map_err(registration_error)?;

        tx.commit()
            .await
            .context("Failed to commit registration")
            .map_err(AppError::database)?;

        UserService::get_profile(db, user_id).await
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_teacher(
        db: &PgPool,
        dto: RegisterTeacherDto,
    ) -> Result<UserProfile, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO users (name, email, password, role)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.name.trim())
        .bind(normalize_email(&dto.email))
        .bind(&hashed_password)
        .bind(UserRole::Teacher)
        .fetch_one(&mut *tx)
        .await
        .map_err(registration_error)?;

        sqlx::query("INSERT INTO teachers (user_id, mobile_number) VALUES ($1, $2)")
            .bind(user_id)
            .bind(dto.mobile_number.trim())
            .execute(&mut *tx)
            .await
            .map_err(registration_error)?;

        tx.commit()
            .await
            .context("Failed to commit registration")
            .map_err(AppError::database)?;

        UserService::get_profile(db, user_id).await
    }
}

fn registration_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        let message = match db_err.constraint() {
            Some("students_registration_number_key") => "Registration number is already in use",
            _ => "Email is already registered",
        };
        return AppError::conflict(anyhow!(message));
    }
    AppError::database(err)
}
