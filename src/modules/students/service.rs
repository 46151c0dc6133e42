use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::{AppError, PaginationParams};
use rollcall_models::{
    StudentDirectoryPage, StudentDirectoryParams, StudentStream, StudentSummary,
    SubjectWithStream,
};

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn enrolled_subjects(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<SubjectWithStream>, AppError> {
        sqlx::query_as::<_, SubjectWithStream>(
            r#"SELECT
                s.id,
                s.name,
                s.description,
                s.stream_id,
                st.name AS stream_name,
                se.created_at AS enrolled_at
               FROM subject_enrollments se
               JOIN subjects s ON s.id = se.subject_id
               JOIN streams st ON st.id = s.stream_id
               WHERE se.student_id = $1
               ORDER BY st.name, s.name"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch enrolled subjects")
        .map_err(AppError::database)
    }

    /// Streams in which the student holds at least one enrollment.
    #[instrument(skip(db))]
    pub async fn enrolled_streams(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<StudentStream>, AppError> {
        sqlx::query_as::<_, StudentStream>(
            r#"SELECT
                st.id,
                st.name,
                st.description,
                t.name AS teacher_name,
                COUNT(se.id) AS enrolled_subjects
               FROM subject_enrollments se
               JOIN subjects s ON s.id = se.subject_id
               JOIN streams st ON st.id = s.stream_id
               JOIN users t ON t.id = st.teacher_id
               WHERE se.student_id = $1
               GROUP BY st.id, st.name, st.description, t.name
               ORDER BY st.name"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch enrolled streams")
        .map_err(AppError::database)
    }

    /// Students ordered by name, one page at a time.
    #[instrument(skip(db))]
    pub async fn directory(
        db: &PgPool,
        params: StudentDirectoryParams,
        pagination: PaginationParams,
    ) -> Result<StudentDirectoryPage, AppError> {
        let registration_number = params
            .registration_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM students s
               WHERE ($1::VARCHAR IS NULL OR s.registration_number = $1)"#,
        )
        .bind(registration_number)
        .fetch_one(db)
        .await
        .context("Failed to count students")
        .map_err(AppError::database)?;

        let data = sqlx::query_as::<_, StudentSummary>(
            r#"SELECT
                u.id,
                u.name,
                u.email,
                s.registration_number,
                s.mobile_number
               FROM students s
               JOIN users u ON u.id = s.user_id
               WHERE ($1::VARCHAR IS NULL OR s.registration_number = $1)
               ORDER BY u.name, u.id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(registration_number)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        Ok(StudentDirectoryPage {
            data,
            meta: pagination.meta(total),
        })
    }
}
