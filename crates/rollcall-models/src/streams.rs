//! Stream models.
//!
//! A stream is a teacher-owned class grouping one or more subjects.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::subjects::Subject;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Stream {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Stream row in a teacher's listing.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StreamSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub subject_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StreamWithSubjects {
    #[serde(flatten)]
    pub stream: Stream,
    pub subjects: Vec<Subject>,
}

/// Stream as seen by an enrolled student.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentStream {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub teacher_name: String,
    /// Number of this stream's subjects the student is enrolled in
    pub enrolled_subjects: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStreamDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[schema(example = "JSS 1A")]
    pub name: String,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_with_subjects_flattens_stream_fields() {
        let stream_id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let value = StreamWithSubjects {
            stream: Stream {
                id: stream_id,
                name: "JSS 1A".to_string(),
                description: None,
                teacher_id: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
            },
            subjects: vec![],
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["id"], stream_id.to_string());
        assert_eq!(json["name"], "JSS 1A");
        assert!(json["subjects"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_empty_stream_name_rejected() {
        let dto = CreateStreamDto {
            name: String::new(),
            description: None,
        };
        assert!(dto.validate().is_err());
    }
}
