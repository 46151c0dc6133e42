use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::AppError;
use rollcall_models::{
    CreateStreamDto, CreateSubjectDto, Stream, StreamStudent, StreamStudentRow, StreamSummary,
    StreamWithSubjects, Subject,
};

use crate::utils::access::load_owned_stream;

pub struct StreamService;

impl StreamService {
    #[instrument(skip(db))]
    pub async fn list_streams(
        db: &PgPool,
        teacher_id: Uuid,
    ) -> Result<Vec<StreamSummary>, AppError> {
        sqlx::query_as::<_, StreamSummary>(
            r#"SELECT
                st.id,
                st.name,
                st.description,
                COUNT(s.id) AS subject_count,
                st.created_at
               FROM streams st
               LEFT JOIN subjects s ON s.stream_id = st.id
               WHERE st.teacher_id = $1
               GROUP BY st.id, st.name, st.description, st.created_at
               ORDER BY st.created_at DESC"#,
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch streams")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn create_stream(
        db: &PgPool,
        teacher_id: Uuid,
        dto: CreateStreamDto,
    ) -> Result<Stream, AppError> {
        sqlx::query_as::<_, Stream>(
            r#"INSERT INTO streams (name, description, teacher_id)
               VALUES ($1, $2, $3)
               RETURNING id, name, description, teacher_id, created_at, updated_at"#,
        )
        .bind(dto.name.trim())
        .bind(&dto.description)
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .context("Failed to insert stream")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_stream(
        db: &PgPool,
        stream_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<StreamWithSubjects, AppError> {
        let stream = load_owned_stream(db, stream_id, teacher_id).await?;
        let subjects = Self::fetch_subjects(db, stream.id).await?;

        Ok(StreamWithSubjects { stream, subjects })
    }

    #[instrument(skip(db))]
    pub async fn list_subjects(
        db: &PgPool,
        stream_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<Vec<Subject>, AppError> {
        let stream = load_owned_stream(db, stream_id, teacher_id).await?;
        Self::fetch_subjects(db, stream.id).await
    }

    #[instrument(skip(db))]
    pub async fn create_subject(
        db: &PgPool,
        stream_id: Uuid,
        teacher_id: Uuid,
        dto: CreateSubjectDto,
    ) -> Result<Subject, AppError> {
        let stream = load_owned_stream(db, stream_id, teacher_id).await?;

        sqlx::query_as::<_, Subject>(
            r#"INSERT INTO subjects (name, description, stream_id)
               VALUES ($1, $2, $3)
               RETURNING id, name, description, stream_id, created_at, updated_at"#,
        )
        .bind(dto.name.trim())
        .bind(&dto.description)
        .bind(stream.id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow!(
                    "A subject with this name already exists in this stream"
                ));
            }
            AppError::database(e)
        })
    }

    /// Students holding at least one enrollment in the stream, with their
    /// attendance counted over the stream's subjects they are enrolled in.
    #[instrument(skip(db))]
    pub async fn list_students(
        db: &PgPool,
        stream_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<Vec<StreamStudent>, AppError> {
        let stream = load_owned_stream(db, stream_id, teacher_id).await?;

        let rows = sqlx::query_as::<_, StreamStudentRow>(
            r#"SELECT
                u.id,
                u.name,
                u.email,
                st.registration_number,
                COUNT(DISTINCT se.subject_id) AS enrolled_subjects,
                COUNT(a.id) FILTER (WHERE a.status = 'present') AS present,
                COUNT(a.id) FILTER (WHERE a.status = 'absent') AS absent,
                COUNT(a.id) FILTER (WHERE a.status = 'late') AS late
               FROM subject_enrollments se
               JOIN subjects s ON s.id = se.subject_id
               JOIN users u ON u.id = se.student_id
               JOIN students st ON st.user_id = u.id
               LEFT JOIN attendance a
                 ON a.student_id = se.student_id AND a.subject_id = se.subject_id
               WHERE s.stream_id = $1
               GROUP BY u.id, u.name, u.email, st.registration_number
               ORDER BY u.name"#,
        )
        .bind(stream.id)
        .fetch_all(db)
        .await
        .context("Failed to fetch stream students")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(StreamStudent::from).collect())
    }

    async fn fetch_subjects(db: &PgPool, stream_id: Uuid) -> Result<Vec<Subject>, AppError> {
        sqlx::query_as::<_, Subject>(
            r#"SELECT id, name, description, stream_id, created_at, updated_at
               FROM subjects
               WHERE stream_id = $1
               ORDER BY name"#,
        )
        .bind(stream_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch subjects")
        .map_err(AppError::database)
    }
}
