//! Resource-level access checks shared by the teacher and student routes.
//!
//! Each loader first confirms the resource exists (404) and only then
//! compares ownership or enrollment (403). The decision functions are pure
//! so the rules can be exercised without a database.

use anyhow::{Context, anyhow};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::AppError;
use rollcall_models::{Stream, UserRole};

#[derive(Debug, Clone, FromRow)]
pub struct SubjectOwnership {
    pub subject_id: Uuid,
    pub stream_id: Uuid,
    pub teacher_id: Uuid,
}

/// The teacher must own the stream.
pub fn ensure_stream_owner(owner_id: Uuid, teacher_id: Uuid) -> Result<(), AppError> {
    if owner_id != teacher_id {
        return Err(AppError::forbidden(
            "You do not have access to this stream".to_string(),
        ));
    }
    Ok(())
}

/// The teacher must own the stream the subject belongs to.
pub fn ensure_subject_owner(
    ownership: &SubjectOwnership,
    teacher_id: Uuid,
) -> Result<(), AppError> {
    if ownership.teacher_id != teacher_id {
        return Err(AppError::forbidden(
            "You do not have access to this subject".to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_enrolled(enrolled: bool, resource: &str) -> Result<(), AppError> {
    if !enrolled {
        return Err(AppError::forbidden(format!(
            "You are not enrolled in this {}",
            resource
        )));
    }
    Ok(())
}

/// Account deletion rules.
///
/// Anyone may delete themselves. Students may delete nobody else. Teachers
/// may never delete another teacher, and may delete a student only when
/// `teaches_target` (the student is enrolled in a subject of one of the
/// teacher's streams).
pub fn check_user_deletion(
    actor_id: Uuid,
    actor_role: UserRole,
    target_id: Uuid,
    target_role: UserRole,
    teaches_target: bool,
) -> Result<(), AppError> {
    if actor_id == target_id {
        return Ok(());
    }

    match (actor_role, target_role) {
        (UserRole::Student, _) => Err(AppError::forbidden(
            "Students can only delete their own account".to_string(),
        )),
        (UserRole::Teacher, UserRole::Teacher) => Err(AppError::forbidden(
            "Teachers cannot delete another teacher's account".to_string(),
        )),
        (UserRole::Teacher, UserRole::Student) if teaches_target => Ok(()),
        (UserRole::Teacher, UserRole::Student) => Err(AppError::forbidden(
            "You can only delete students enrolled in your streams".to_string(),
        )),
    }
}

#[instrument(skip(db))]
pub async fn load_owned_stream(
    db: &PgPool,
    stream_id: Uuid,
    teacher_id: Uuid,
) -> Result<Stream, AppError> {
    let stream = sqlx::query_as::<_, Stream>(
        r#"SELECT id, name, description, teacher_id, created_at, updated_at
           FROM streams WHERE id = $1"#,
    )
    .bind(stream_id)
    .fetch_optional(db)
    .await
    .context("Failed to fetch stream")
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow!("Stream not found")))?;

    ensure_stream_owner(stream.teacher_id, teacher_id)?;

    Ok(stream)
}

#[instrument(skip(db))]
pub async fn load_owned_subject(
    db: &PgPool,
    subject_id: Uuid,
    teacher_id: Uuid,
) -> Result<SubjectOwnership, AppError> {
    let ownership = sqlx::query_as::<_, SubjectOwnership>(
        r#"SELECT s.id AS subject_id, s.stream_id, st.teacher_id
           FROM subjects s
           JOIN streams st ON st.id = s.stream_id
           WHERE s.id = $1"#,
    )
    .bind(subject_id)
    .fetch_optional(db)
    .await
    .context("Failed to fetch subject")
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow!("Subject not found")))?;

    ensure_subject_owner(&ownership, teacher_id)?;

    Ok(ownership)
}

/// Confirms the subject exists and the student holds an enrollment in it.
#[instrument(skip(db))]
pub async fn ensure_subject_enrollment(
    db: &PgPool,
    student_id: Uuid,
    subject_id: Uuid,
) -> Result<(), AppError> {
    let enrolled = sqlx::query_scalar::<_, Option<bool>>(
        r#"SELECT EXISTS(
               SELECT 1 FROM subject_enrollments
               WHERE subject_id = s.id AND student_id = $2
           )
           FROM subjects s WHERE s.id = $1"#,
    )
    .bind(subject_id)
    .bind(student_id)
    .fetch_optional(db)
    .await
    .context("Failed to check subject enrollment")
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow!("Subject not found")))?;

    ensure_enrolled(enrolled.unwrap_or(false), "subject")
}

/// Confirms the stream exists and the student holds at least one
/// enrollment in its subjects.
#[instrument(skip(db))]
pub async fn ensure_stream_enrollment(
    db: &PgPool,
    student_id: Uuid,
    stream_id: Uuid,
) -> Result<(), AppError> {
    let enrolled = sqlx::query_scalar::<_, Option<bool>>(
        r#"SELECT EXISTS(
               SELECT 1 FROM subject_enrollments se
               JOIN subjects s ON s.id = se.subject_id
               WHERE s.stream_id = st.id AND se.student_id = $2
           )
           FROM streams st WHERE st.id = $1"#,
    )
    .bind(stream_id)
    .bind(student_id)
    .fetch_optional(db)
    .await
    .context("Failed to check stream enrollment")
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow!("Stream not found")))?;

    ensure_enrolled(enrolled.unwrap_or(false), "stream")
}

/// Whether the student is enrolled in any subject of any of the teacher's streams.
#[instrument(skip(conn))]
pub async fn teacher_teaches_student(
    conn: &mut PgConnection,
    teacher_id: Uuid,
    student_id: Uuid,
) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        r#"SELECT EXISTS(
               SELECT 1 FROM subject_enrollments se
               JOIN subjects s ON s.id = se.subject_id
               JOIN streams st ON st.id = s.stream_id
               WHERE st.teacher_id = $1 AND se.student_id = $2
           )"#,
    )
    .bind(teacher_id)
    .bind(student_id)
    .fetch_one(conn)
    .await
    .context("Failed to check teacher/student relation")
    .map_err(AppError::database)
}
