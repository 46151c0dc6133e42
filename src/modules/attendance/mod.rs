pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_student_attendance_router, init_teacher_attendance_router};
