//! Seed records and seeding configuration.

use rollcall_models::UserRole;

/// Domain used for every generated account, so seeded users can be cleared
/// without touching real ones.
pub const SEED_EMAIL_DOMAIN: &str = "seed.rollcall.test";

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// Seed data for creating a user and its role row.
pub struct UserSeed {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub mobile_number: String,
    /// Only set for students
    pub registration_number: Option<String>,
}

pub struct StreamSeed {
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: uuid::Uuid,
}

pub struct SubjectSeed {
    pub name: String,
    pub stream_id: uuid::Uuid,
}

/// Shape of the stream tree built for each teacher.
#[derive(Clone)]
pub struct StreamsPerTeacher {
    pub count: usize,
    pub subjects_per_stream: usize,
    pub students_per_stream: usize,
}

impl Default for StreamsPerTeacher {
    fn default() -> Self {
        Self {
            count: 2,
            subjects_per_stream: 4,
            students_per_stream: 20,
        }
    }
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub num_teachers: usize,
    pub streams_per_teacher: StreamsPerTeacher,
    /// Weekdays of attendance generated, counting back from today
    pub attendance_days: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_teachers: 3,
            streams_per_teacher: StreamsPerTeacher::default(),
            attendance_days: 20,
        }
    }
}

impl SeedConfig {
    pub fn new(num_teachers: usize) -> Self {
        Self {
            num_teachers,
            ..Default::default()
        }
    }

    pub fn with_streams(mut self, streams: StreamsPerTeacher) -> Self {
        self.streams_per_teacher = streams;
        self
    }

    pub fn with_attendance_days(mut self, days: usize) -> Self {
        self.attendance_days = days;
        self
    }

    pub fn total_students(&self) -> usize {
        self.num_teachers * self.streams_per_teacher.count * self.streams_per_teacher.students_per_stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_students() {
        let config = SeedConfig::new(2).with_streams(StreamsPerTeacher {
            count: 3,
            subjects_per_stream: 1,
            students_per_stream: 10,
        });
        assert_eq!(config.total_students(), 60);
    }
}
