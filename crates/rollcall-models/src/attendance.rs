//! Attendance models and aggregation.
//!
//! Reports are narrowed by [`AttendanceQuery`]. Counts are taken over the
//! whole filtered set; only the returned record list is truncated to `limit`.

use anyhow::anyhow;
use chrono::NaiveDate;
use rollcall_core::AppError;
use rollcall_core::serde::{
    deserialize_optional_i32, deserialize_optional_i64, deserialize_optional_uuid,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const MAX_LIMIT: i64 = 500;

/// Presence status for one day. Stored as the Postgres enum `attendance_status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Filters accepted by the attendance listing routes.
///
/// `month` without `year` matches that month in every year.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Restrict to one subject
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub subject_id: Option<Uuid>,
    /// Month number (1-12)
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub month: Option<i32>,
    /// Four-digit year
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    #[validate(range(min = 1970, max = 9999, message = "year must be between 1970 and 9999"))]
    pub year: Option<i32>,
    /// Maximum number of records returned (1-500)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[validate(range(min = 1, max = 500, message = "limit must be between 1 and 500"))]
    pub limit: Option<i64>,
}

impl AttendanceQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(MAX_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Present/absent/late counts with the attendance percentage.
///
/// Late counts as attended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    /// `round(100 * (present + late) / total)`, 0 when there are no records
    pub percentage: i64,
}

impl AttendanceSummary {
    pub fn from_counts(present: i64, absent: i64, late: i64) -> Self {
        let total = present + absent + late;
        let percentage = if total == 0 {
            0
        } else {
            ((present + late) as f64 * 100.0 / total as f64).round() as i64
        };

        Self {
            total,
            present,
            absent,
            late,
            percentage,
        }
    }
}

/// Filtered attendance records, newest first, with their summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceReport {
    pub summary: AttendanceSummary,
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceEntry {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MarkAttendanceDto {
    #[schema(example = "2024-01-05")]
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 500, message = "records must contain 1-500 entries"))]
    pub records: Vec<AttendanceEntry>,
}

impl MarkAttendanceDto {
    /// Rejects a request that lists the same student twice.
    pub fn ensure_unique_students(&self) -> Result<(), AppError> {
        let mut seen = std::collections::HashSet::with_capacity(self.records.len());
        for entry in &self.records {
            if !seen.insert(entry.student_id) {
                return Err(AppError::bad_request(anyhow!(
                    "Student {} appears more than once",
                    entry.student_id
                )));
            }
        }
        Ok(())
    }

    pub fn student_ids(&self) -> Vec<Uuid> {
        self.records.iter().map(|e| e.student_id).collect()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarkAttendanceResponse {
    pub subject_id: Uuid,
    pub date: NaiveDate,
    pub marked_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_zero_when_no_records() {
        let summary = AttendanceSummary::from_counts(0, 0, 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percentage, 0);
    }

    #[test]
    fn test_late_counts_as_attended() {
        let summary = AttendanceSummary::from_counts(3, 1, 1);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.percentage, 80);
    }

    #[test]
    fn test_percentage_rounds_to_nearest() {
        assert_eq!(AttendanceSummary::from_counts(2, 1, 0).percentage, 67);
        assert_eq!(AttendanceSummary::from_counts(1, 2, 0).percentage, 33);
    }

    #[test]
    fn test_limit_defaults_and_clamps() {
        assert_eq!(AttendanceQuery::default().limit(), MAX_LIMIT);
        let query = AttendanceQuery {
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(query.limit(), 2);
    }

    #[test]
    fn test_query_ranges_validated() {
        let bad_month = AttendanceQuery {
            month: Some(13),
            ..Default::default()
        };
        assert!(bad_month.validate().is_err());

        let bad_limit = AttendanceQuery {
            limit: Some(501),
            ..Default::default()
        };
        assert!(bad_limit.validate().is_err());

        let bad_year = AttendanceQuery {
            year: Some(1969),
            ..Default::default()
        };
        assert!(bad_year.validate().is_err());
    }

    #[test]
    fn test_query_treats_empty_params_as_absent() {
        let query: AttendanceQuery =
            serde_json::from_str(r#"{"month":"","year":"2024","limit":""}"#).unwrap();
        assert_eq!(query.month, None);
        assert_eq!(query.year, Some(2024));
        assert_eq!(query.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_duplicate_students_rejected() {
        let student = Uuid::new_v4();
        let dto = MarkAttendanceDto {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            records: vec![
                AttendanceEntry {
                    student_id: student,
                    status: AttendanceStatus::Present,
                },
                AttendanceEntry {
                    student_id: student,
                    status: AttendanceStatus::Late,
                },
            ],
        };
        let err = dto.ensure_unique_students().unwrap_err();
        assert_eq!(err.status().as_u16(), 400);
    }

    #[test]
    fn test_empty_records_fail_validation() {
        let dto = MarkAttendanceDto {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            records: vec![],
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("records"));
    }

    #[test]
    fn test_single_record_passes_validation() {
        let dto = MarkAttendanceDto {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            records: vec![AttendanceEntry {
                student_id: Uuid::new_v4(),
                status: AttendanceStatus::Absent,
            }],
        };
        assert!(dto.validate().is_ok());
    }
}
