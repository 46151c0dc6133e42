use anyhow::{Context, anyhow};
use sqlx::{PgPool, Postgres};
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::AppError;
use rollcall_models::{
    EnrollStudentDto, StreamEnrollmentResponse, StudentRef, SubjectEnrollment, UnenrollResponse,
    plan_stream_enrollment,
};

use crate::utils::access::{load_owned_stream, load_owned_subject};

pub struct EnrollmentService;

impl EnrollmentService {
    /// Looks up a student account by id or registration number.
    #[instrument(skip(db))]
    pub async fn resolve_student(db: &PgPool, student: StudentRef<'_>) -> Result<Uuid, AppError> {
        let query = match student {
            StudentRef::Id(id) => sqlx::query_scalar::<Postgres, Uuid>(
                "SELECT user_id FROM students WHERE user_id = $1",
            )
            .bind(id),
            StudentRef::RegistrationNumber(number) => sqlx::query_scalar::<Postgres, Uuid>(
                "SELECT user_id FROM students WHERE registration_number = $1",
            )
            .bind(number.trim()),
        };

        query
            .fetch_optional(db)
            .await
            .context("Failed to fetch student")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    /// Enrolls the student in every subject of the stream they do not
    /// already hold, in one transaction.
    #[instrument(skip(db))]
    pub async fn enroll_in_stream(
        db: &PgPool,
        stream_id: Uuid,
        teacher_id: Uuid,
        dto: EnrollStudentDto,
    ) -> Result<StreamEnrollmentResponse, AppError> {
        let student = dto.student_ref()?;
        let stream = load_owned_stream(db, stream_id, teacher_id).await?;
        let student_id = Self::resolve_student(db, student).await?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let stream_subjects = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM subjects WHERE stream_id = $1 ORDER BY name",
        )
        .bind(stream.id)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to fetch stream subjects")
        .map_err(AppError::database)?;

        let held = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT se.subject_id
               FROM subject_enrollments se
               JOIN subjects s ON s.id = se.subject_id
               WHERE s.stream_id = $1 AND se.student_id = $2"#,
        )
        .bind(stream.id)
        .bind(student_id)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to fetch existing enrollments")
        .map_err(AppError::database)?;

        let planned = plan_stream_enrollment(&stream_subjects, &held)?;

        let mut subject_ids = Vec::with_capacity(planned.len());
        for subject_id in planned {
            let inserted = sqlx::query_scalar::<_, Uuid>(
                r#"INSERT INTO subject_enrollments (student_id, subject_id)
                   VALUES ($1, $2)
                   ON CONFLICT (student_id, subject_id) DO NOTHING
                   RETURNING subject_id"#,
            )
            .bind(student_id)
            .bind(subject_id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to insert enrollment")
            .map_err(AppError::database)?;

            subject_ids.extend(inserted);
        }

        // A concurrent request may have taken every planned row.
        if subject_ids.is_empty() {
            return Err(AppError::conflict(anyhow!(
                "Student is already enrolled in every subject of this stream (0 new enrollments)"
            )));
        }

        tx.commit()
            .await
            .context("Failed to commit enrollments")
            .map_err(AppError::database)?;

        Ok(StreamEnrollmentResponse {
            stream_id: stream.id,
            student_id,
            enrolled_count: subject_ids.len(),
            subject_ids,
        })
    }

    /// Removes all of the student's enrollments under the stream.
    /// Attendance history is kept.
    #[instrument(skip(db))]
    pub async fn unenroll_from_stream(
        db: &PgPool,
        stream_id: Uuid,
        teacher_id: Uuid,
        student_id: Uuid,
    ) -> Result<UnenrollResponse, AppError> {
        let stream = load_owned_stream(db, stream_id, teacher_id).await?;

        let result = sqlx::query(
            r#"DELETE FROM subject_enrollments se
               USING subjects s
               WHERE se.subject_id = s.id AND s.stream_id = $1 AND se.student_id = $2"#,
        )
        .bind(stream.id)
        .bind(student_id)
        .execute(db)
        .await
        .context("Failed to delete stream enrollments")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(
                "Student is not enrolled in this stream"
            )));
        }

        Ok(UnenrollResponse {
            removed_count: result.rows_affected(),
        })
    }

    #[instrument(skip(db))]
    pub async fn enroll_in_subject(
        db: &PgPool,
        subject_id: Uuid,
        teacher_id: Uuid,
        dto: EnrollStudentDto,
    ) -> Result<SubjectEnrollment, AppError> {
        let student = dto.student_ref()?;
        let subject = load_owned_subject(db, subject_id, teacher_id).await?;
        let student_id = Self::resolve_student(db, student).await?;

        sqlx::query_as::<_, SubjectEnrollment>(
            r#"INSERT INTO subject_enrollments (student_id, subject_id)
               VALUES ($1, $2)
               ON CONFLICT (student_id, subject_id) DO NOTHING
               RETURNING id, student_id, subject_id, created_at"#,
        )
        .bind(student_id)
        .bind(subject.subject_id)
        .fetch_optional(db)
        .await
        .context("Failed to insert enrollment")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::conflict(anyhow!("Student is already enrolled in this subject")))
    }

    #[instrument(skip(db))]
    pub async fn unenroll_from_subject(
        db: &PgPool,
        subject_id: Uuid,
        teacher_id: Uuid,
        student_id: Uuid,
    ) -> Result<UnenrollResponse, AppError> {
        let subject = load_owned_subject(db, subject_id, teacher_id).await?;

        let result = sqlx::query(
            "DELETE FROM subject_enrollments WHERE subject_id = $1 AND student_id = $2",
        )
        .bind(subject.subject_id)
        .bind(student_id)
        .execute(db)
        .await
        .context("Failed to delete enrollment")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(
                "Student is not enrolled in this subject"
            )));
        }

        Ok(UnenrollResponse {
            removed_count: result.rows_affected(),
        })
    }
}
