use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use rollcall_core::PaginationMeta;
use rollcall_models::{
    AttendanceEntry, AttendanceRecord, AttendanceReport, AttendanceStatus, AttendanceSummary,
    CreateStreamDto, CreateSubjectDto, EnrollStudentDto, LoginRequest, LoginResponse,
    MarkAttendanceDto, MarkAttendanceResponse, RegisterStudentDto, RegisterTeacherDto, Stream,
    StreamEnrollmentResponse, StreamStudent, StreamSummary, StreamWithSubjects,
    StudentDirectoryPage, StudentStream, StudentSummary, Subject, SubjectEnrollment,
    SubjectWithStream, UnenrollResponse, UserProfile, UserRole,
};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::health::controller::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::register::controller::register_student,
        crate::modules::register::controller::register_teacher,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::delete_user,
        crate::modules::streams::controller::list_streams,
        crate::modules::streams::controller::create_stream,
        crate::modules::streams::controller::get_stream,
        crate::modules::streams::controller::list_subjects,
        crate::modules::streams::controller::create_subject,
        crate::modules::streams::controller::list_stream_students,
        crate::modules::enrollments::controller::enroll_in_stream,
        crate::modules::enrollments::controller::unenroll_from_stream,
        crate::modules::enrollments::controller::enroll_in_subject,
        crate::modules::enrollments::controller::unenroll_from_subject,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::attendance::controller::get_subject_attendance,
        crate::modules::attendance::controller::get_my_attendance,
        crate::modules::attendance::controller::get_my_subject_attendance,
        crate::modules::attendance::controller::get_my_stream_attendance,
        crate::modules::students::controller::get_my_subjects,
        crate::modules::students::controller::get_my_streams,
        crate::modules::students::controller::get_student_directory,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            UserRole,
            UserProfile,
            RegisterStudentDto,
            RegisterTeacherDto,
            LoginRequest,
            LoginResponse,
            Stream,
            StreamSummary,
            StreamWithSubjects,
            StudentStream,
            CreateStreamDto,
            Subject,
            SubjectWithStream,
            CreateSubjectDto,
            StudentSummary,
            StudentDirectoryPage,
            PaginationMeta,
            StreamStudent,
            EnrollStudentDto,
            SubjectEnrollment,
            StreamEnrollmentResponse,
            UnenrollResponse,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceSummary,
            AttendanceReport,
            AttendanceEntry,
            MarkAttendanceDto,
            MarkAttendanceResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Registration", description = "Student and teacher sign-up"),
        (name = "Authentication", description = "Login"),
        (name = "Users", description = "Profile and account deletion"),
        (name = "Streams", description = "Teacher streams, subjects and rosters"),
        (name = "Enrollments", description = "Teacher-managed subject enrollments"),
        (name = "Attendance", description = "Attendance marking and reports"),
        (name = "Student", description = "Student views of subjects, streams and attendance")
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "School attendance tracking for teachers and students.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
