//! Subject enrollment models and stream enrollment planning.

use std::collections::HashSet;

use anyhow::anyhow;
use rollcall_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::attendance::AttendanceSummary;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SubjectEnrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Identifies the student to enroll, by id or by registration number.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EnrollStudentDto {
    pub student_id: Option<Uuid>,
    #[validate(length(
        min = 1,
        max = 50,
        message = "registration_number must be 1-50 characters"
    ))]
    #[schema(example = "STU-2024-001")]
    pub registration_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentRef<'a> {
    Id(Uuid),
    RegistrationNumber(&'a str),
}

impl EnrollStudentDto {
    /// Exactly one of `student_id` and `registration_number` must be given.
    pub fn student_ref(&self) -> Result<StudentRef<'_>, AppError> {
        match (self.student_id, self.registration_number.as_deref()) {
            (Some(id), None) => Ok(StudentRef::Id(id)),
            (None, Some(number)) => Ok(StudentRef::RegistrationNumber(number)),
            (Some(_), Some(_)) => Err(AppError::bad_request(anyhow!(
                "Provide either student_id or registration_number, not both"
            ))),
            (None, None) => Err(AppError::bad_request(anyhow!(
                "student_id or registration_number is required"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StreamEnrollmentResponse {
    pub stream_id: Uuid,
    pub student_id: Uuid,
    pub enrolled_count: usize,
    /// Subjects the student was newly enrolled in
    pub subject_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnenrollResponse {
    pub removed_count: u64,
}

/// Decides which of a stream's subjects a student still needs.
///
/// Fails with 400 when the stream has no subjects and with 409 when the
/// student already holds every enrollment. Order follows `stream_subjects`.
pub fn plan_stream_enrollment(
    stream_subjects: &[Uuid],
    held: &[Uuid],
) -> Result<Vec<Uuid>, AppError> {
    if stream_subjects.is_empty() {
        return Err(AppError::bad_request(anyhow!(
            "Stream has no subjects to enroll in; add a subject first"
        )));
    }

    let held: HashSet<&Uuid> = held.iter().collect();
    let missing: Vec<Uuid> = stream_subjects
        .iter()
        .filter(|id| !held.contains(id))
        .copied()
        .collect();

    if missing.is_empty() {
        return Err(AppError::conflict(anyhow!(
            "Student is already enrolled in every subject of this stream (0 new enrollments)"
        )));
    }

    Ok(missing)
}

/// Raw roster row with attendance counts aggregated in SQL.
#[derive(Debug, Clone, FromRow)]
pub struct StreamStudentRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub enrolled_subjects: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
}

/// Student enrolled in a stream, with attendance across its subjects.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StreamStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub enrolled_subjects: i64,
    pub attendance: AttendanceSummary,
}

impl From<StreamStudentRow> for StreamStudent {
    fn from(row: StreamStudentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            registration_number: row.registration_number,
            enrolled_subjects: row.enrolled_subjects,
            attendance: AttendanceSummary::from_counts(row.present, row.absent, row.late),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_without_subjects_is_rejected() {
        let err = plan_stream_enrollment(&[], &[]).unwrap_err();
        assert_eq!(err.status().as_u16(), 400);
        assert!(err.message().contains("no subjects"));
    }

    #[test]
    fn test_fully_enrolled_student_is_conflict() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let err = plan_stream_enrollment(&[a, b], &[b, a]).unwrap_err();
        assert_eq!(err.status().as_u16(), 409);
        assert!(err.message().contains("0 new enrollments"));
    }

    #[test]
    fn test_only_missing_subjects_are_planned() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let planned = plan_stream_enrollment(&[a, b, c], &[b]).unwrap();
        assert_eq!(planned, vec![a, c]);
    }

    #[test]
    fn test_holdings_outside_stream_are_ignored() {
        let a = Uuid::new_v4();
        let elsewhere = Uuid::new_v4();
        let planned = plan_stream_enrollment(&[a], &[elsewhere]).unwrap();
        assert_eq!(planned, vec![a]);
    }

    #[test]
    fn test_student_ref_requires_exactly_one_identifier() {
        let by_id = EnrollStudentDto {
            student_id: Some(Uuid::nil()),
            registration_number: None,
        };
        assert_eq!(by_id.student_ref().unwrap(), StudentRef::Id(Uuid::nil()));

        let by_number = EnrollStudentDto {
            student_id: None,
            registration_number: Some("STU-1".to_string()),
        };
        assert_eq!(
            by_number.student_ref().unwrap(),
            StudentRef::RegistrationNumber("STU-1")
        );

        let neither = EnrollStudentDto {
            student_id: None,
            registration_number: None,
        };
        assert!(neither.student_ref().is_err());

        let both = EnrollStudentDto {
            student_id: Some(Uuid::nil()),
            registration_number: Some("STU-1".to_string()),
        };
        assert!(both.student_ref().is_err());
    }

    #[test]
    fn test_roster_row_converts_counts_to_summary() {
        let row = StreamStudentRow {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@school.test".to_string(),
            registration_number: "STU-1".to_string(),
            enrolled_subjects: 2,
            present: 3,
            absent: 1,
            late: 1,
        };
        let student = StreamStudent::from(row);
        assert_eq!(student.attendance.percentage, 80);
    }
}
