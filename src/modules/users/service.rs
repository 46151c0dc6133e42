use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::AppError;
use rollcall_models::{UserProfile, UserRole};

use crate::utils::access::{check_user_deletion, teacher_teaches_student};

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, user_id: Uuid) -> Result<UserProfile, AppError> {
        sqlx::query_as::<_, UserProfile>(
            r#"SELECT
                u.id,
                u.name,
                u.email,
                u.role,
                s.registration_number,
                COALESCE(s.mobile_number, t.mobile_number) AS mobile_number,
                u.created_at
               FROM users u
               LEFT JOIN students s ON s.user_id = u.id
               LEFT JOIN teachers t ON t.user_id = u.id
               WHERE u.id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user profile")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Deletes an account. Enrollments and attendance go with it through
    /// `ON DELETE CASCADE`; a teacher's streams and subjects do too.
    #[instrument(skip(db))]
    pub async fn delete_user(
        db: &PgPool,
        actor_id: Uuid,
        actor_role: UserRole,
        target_id: Uuid,
    ) -> Result<UserRole, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let target_role = sqlx::query_scalar::<_, UserRole>(
            "SELECT role FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch user")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        let teaches_target = actor_role == UserRole::Teacher
            && target_role == UserRole::Student
            && actor_id != target_id
            && teacher_teaches_student(&mut *tx, actor_id, target_id).await?;

        check_user_deletion(actor_id, actor_role, target_id, target_role, teaches_target)?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(target_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete user")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit user deletion")
            .map_err(AppError::database)?;

        Ok(target_role)
    }
}
