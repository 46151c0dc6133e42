//! # Rollcall Models
//!
//! Domain models and DTOs for the Rollcall API.
//!
//! This crate provides the data structures shared by the API and the CLI:
//! database entities, request/response DTOs, validation rules, and the pure
//! enrollment and attendance logic that routes build on.
//!
//! # Modules
//!
//! - [`users`]: Users, roles, registration DTOs and profiles
//! - [`auth`]: Login request/response
//! - [`streams`]: Teacher-owned streams
//! - [`subjects`]: Subjects within a stream
//! - [`enrollments`]: Subject enrollments and stream enrollment planning
//! - [`attendance`]: Attendance records, filters and aggregation
//!
//! # Example
//!
//! ```ignore
//! use rollcall_models::attendance::AttendanceSummary;
//!
//! let summary = AttendanceSummary::from_counts(3, 1, 1);
//! assert_eq!(summary.percentage, 80);
//! ```

pub mod attendance;
pub mod auth;
pub mod enrollments;
pub mod streams;
pub mod subjects;
pub mod users;

pub use attendance::{
    AttendanceEntry, AttendanceQuery, AttendanceRecord, AttendanceReport, AttendanceStatus,
    AttendanceSummary, MarkAttendanceDto, MarkAttendanceResponse,
};
pub use auth::{Claims, LoginRequest, LoginResponse};
pub use enrollments::{
    EnrollStudentDto, StreamEnrollmentResponse, StreamStudent, StreamStudentRow, StudentRef,
    SubjectEnrollment, UnenrollResponse, plan_stream_enrollment,
};
pub use streams::{CreateStreamDto, Stream, StreamSummary, StreamWithSubjects, StudentStream};
pub use subjects::{CreateSubjectDto, Subject, SubjectWithStream};
pub use users::{
    RegisterStudentDto, RegisterTeacherDto, StudentDirectoryPage, StudentDirectoryParams,
    StudentSummary, User, UserProfile, UserRole,
};
