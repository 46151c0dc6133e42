use std::collections::HashSet;

use anyhow::Context;
use sqlx::{PgPool, Postgres};
use tracing::instrument;
use uuid::Uuid;

use rollcall_core::AppError;
use rollcall_models::{
    AttendanceQuery, AttendanceRecord, AttendanceReport, AttendanceSummary, MarkAttendanceDto,
    MarkAttendanceResponse,
};

use crate::utils::access::{
    ensure_stream_enrollment, ensure_subject_enrollment, load_owned_subject,
};

const RECORD_SELECT: &str = r#"SELECT
    a.id,
    a.student_id,
    u.name AS student_name,
    a.subject_id,
    s.name AS subject_name,
    a.date,
    a.status,
    a.created_at
   FROM attendance a
   JOIN users u ON u.id = a.student_id
   JOIN subjects s ON s.id = a.subject_id"#;

const SUMMARY_SELECT: &str = r#"SELECT
    COUNT(*) FILTER (WHERE a.status = 'present') AS present,
    COUNT(*) FILTER (WHERE a.status = 'absent') AS absent,
    COUNT(*) FILTER (WHERE a.status = 'late') AS late
   FROM attendance a
   JOIN subjects s ON s.id = a.subject_id"#;

const RECORD_FILTER: &str = r#"
   WHERE ($1::UUID IS NULL OR a.student_id = $1)
     AND ($2::UUID IS NULL OR s.stream_id = $2)
     AND ($3::UUID IS NULL OR a.subject_id = $3)
     AND ($4::INT IS NULL OR EXTRACT(MONTH FROM a.date) = $4)
     AND ($5::INT IS NULL OR EXTRACT(YEAR FROM a.date) = $5)"#;

/// Whose attendance rows a report covers.
#[derive(Debug, Clone, Copy)]
enum RecordScope {
    Student(Uuid),
    StudentInStream { student_id: Uuid, stream_id: Uuid },
    Subject(Uuid),
}

/// Bind values for [`RECORD_FILTER`]; `None` leaves a column unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RecordFilter {
    student_id: Option<Uuid>,
    stream_id: Option<Uuid>,
    subject_id: Option<Uuid>,
    month: Option<i32>,
    year: Option<i32>,
}

impl RecordFilter {
    fn new(scope: RecordScope, query: &AttendanceQuery) -> Self {
        let (student_id, stream_id, subject_id) = match scope {
            RecordScope::Student(student_id) => (Some(student_id), None, query.subject_id),
            RecordScope::StudentInStream {
                student_id,
                stream_id,
            } => (Some(student_id), Some(stream_id), query.subject_id),
            RecordScope::Subject(subject_id) => (None, None, Some(subject_id)),
        };

        Self {
            student_id,
            stream_id,
            subject_id,
            month: query.month,
            year: query.year,
        }
    }

    /// Subject reports list a day's students by name; student reports by entry time.
    fn order_by(&self) -> &'static str {
        if self.student_id.is_some() {
            " ORDER BY a.date DESC, a.created_at DESC"
        } else {
            " ORDER BY a.date DESC, u.name"
        }
    }
}

/// Requested students that hold no enrollment, in request order.
pub fn unenrolled_students(requested: &[Uuid], enrolled: &[Uuid]) -> Vec<Uuid> {
    let enrolled: HashSet<&Uuid> = enrolled.iter().collect();
    requested
        .iter()
        .filter(|id| !enrolled.contains(id))
        .copied()
        .collect()
}

pub struct AttendanceService;

impl AttendanceService {
    /// Upserts one status per listed student for the date. Every student
    /// must be enrolled in the subject; otherwise nothing is written.
    #[instrument(skip(db, dto), fields(date = %dto.date, count = dto.records.len()))]
    pub async fn mark_attendance(
        db: &PgPool,
        subject_id: Uuid,
        teacher_id: Uuid,
        dto: MarkAttendanceDto,
    ) -> Result<MarkAttendanceResponse, AppError> {
        dto.ensure_unique_students()?;
        let subject = load_owned_subject(db, subject_id, teacher_id).await?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let requested = dto.student_ids();
        let enrolled = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT student_id FROM subject_enrollments
               WHERE subject_id = $1 AND student_id = ANY($2)"#,
        )
        .bind(subject.subject_id)
        .bind(&requested)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to fetch enrollments")
        .map_err(AppError::database)?;

        let missing = unenrolled_students(&requested, &enrolled);
        if !missing.is_empty() {
            let ids = missing
                .iter()
                .map(Uuid::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::forbidden(format!(
                "Students not enrolled in this subject: {}",
                ids
            )));
        }

        for entry in &dto.records {
            sqlx::query(
                r#"INSERT INTO attendance (student_id, subject_id, date, status)
                   VALUES ($1, $2, $3, $4)
                   ON CONFLICT (student_id, subject_id, date)
                   DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()"#,
            )
            .bind(entry.student_id)
            .bind(subject.subject_id)
            .bind(dto.date)
            .bind(entry.status)
            .execute(&mut *tx)
            .await
            .context("Failed to record attendance")
            .map_err(AppError::database)?;
        }

        tx.commit()
            .await
            .context("Failed to commit attendance")
            .map_err(AppError::database)?;

        Ok(MarkAttendanceResponse {
            subject_id: subject.subject_id,
            date: dto.date,
            marked_count: dto.records.len(),
        })
    }

    #[instrument(skip(db))]
    pub async fn subject_attendance(
        db: &PgPool,
        subject_id: Uuid,
        teacher_id: Uuid,
        query: AttendanceQuery,
    ) -> Result<AttendanceReport, AppError> {
        let subject = load_owned_subject(db, subject_id, teacher_id).await?;
        Self::report(db, RecordScope::Subject(subject.subject_id), &query).await
    }

    /// All of the student's records; a `subject_id` filter must name an
    /// enrolled subject.
    #[instrument(skip(db))]
    pub async fn student_attendance(
        db: &PgPool,
        student_id: Uuid,
        query: AttendanceQuery,
    ) -> Result<AttendanceReport, AppError> {
        if let Some(subject_id) = query.subject_id {
            ensure_subject_enrollment(db, student_id, subject_id).await?;
        }

        Self::report(db, RecordScope::Student(student_id), &query).await
    }

    #[instrument(skip(db))]
    pub async fn student_subject_attendance(
        db: &PgPool,
        student_id: Uuid,
        subject_id: Uuid,
        query: AttendanceQuery,
    ) -> Result<AttendanceReport, AppError> {
        ensure_subject_enrollment(db, student_id, subject_id).await?;

        let query = AttendanceQuery {
            subject_id: Some(subject_id),
            ..query
        };
        Self::report(db, RecordScope::Student(student_id), &query).await
    }

    #[instrument(skip(db))]
    pub async fn student_stream_attendance(
        db: &PgPool,
        student_id: Uuid,
        stream_id: Uuid,
        query: AttendanceQuery,
    ) -> Result<AttendanceReport, AppError> {
        ensure_stream_enrollment(db, student_id, stream_id).await?;

        Self::report(
            db,
            RecordScope::StudentInStream {
                student_id,
                stream_id,
            },
            &query,
        )
        .await
    }

    /// Counts every matching row, then returns the newest `limit` of them.
    async fn report(
        db: &PgPool,
        scope: RecordScope,
        query: &AttendanceQuery,
    ) -> Result<AttendanceReport, AppError> {
        let filter = RecordFilter::new(scope, query);

        let summary_sql = format!("{}{}", SUMMARY_SELECT, RECORD_FILTER);
        let (present, absent, late) = sqlx::query_as::<Postgres, (i64, i64, i64)>(&summary_sql)
            .bind(filter.student_id)
            .bind(filter.stream_id)
            .bind(filter.subject_id)
            .bind(filter.month)
            .bind(filter.year)
            .fetch_one(db)
            .await
            .context("Failed to count attendance records")
            .map_err(AppError::database)?;

        let records_sql = format!(
            "{}{}{} LIMIT $6",
            RECORD_SELECT,
            RECORD_FILTER,
            filter.order_by()
        );
        let records = sqlx::query_as::<Postgres, AttendanceRecord>(&records_sql)
            .bind(filter.student_id)
            .bind(filter.stream_id)
            .bind(filter.subject_id)
            .bind(filter.month)
            .bind(filter.year)
            .bind(query.limit())
            .fetch_all(db)
            .await
            .context("Failed to fetch attendance records")
            .map_err(AppError::database)?;

        Ok(AttendanceReport {
            summary: AttendanceSummary::from_counts(present, absent, late),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_enrolled_yields_nothing() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(unenrolled_students(&[a, b], &[b, a]).is_empty());
    }

    #[test]
    fn test_unenrolled_students_reported_in_request_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert_eq!(unenrolled_students(&[c, a, b], &[a]), vec![c, b]);
    }

    #[test]
    fn test_subject_scope_ignores_query_subject() {
        let subject = Uuid::new_v4();
        let query = AttendanceQuery {
            subject_id: Some(Uuid::new_v4()),
            month: Some(3),
            ..Default::default()
        };
        let filter = RecordFilter::new(RecordScope::Subject(subject), &query);
        assert_eq!(filter.subject_id, Some(subject));
        assert_eq!(filter.student_id, None);
        assert_eq!(filter.month, Some(3));
        assert!(filter.order_by().contains("u.name"));
    }

    #[test]
    fn test_stream_scope_keeps_subject_and_period_filters() {
        let student_id = Uuid::new_v4();
        let stream_id = Uuid::new_v4();
        let subject_id = Uuid::new_v4();
        let query = AttendanceQuery {
            subject_id: Some(subject_id),
            year: Some(2024),
            ..Default::default()
        };
        let filter = RecordFilter::new(
            RecordScope::StudentInStream {
                student_id,
                stream_id,
            },
            &query,
        );
        assert_eq!(
            filter,
            RecordFilter {
                student_id: Some(student_id),
                stream_id: Some(stream_id),
                subject_id: Some(subject_id),
                month: None,
                year: Some(2024),
            }
        );
        assert!(filter.order_by().contains("a.created_at DESC"));
    }
}
