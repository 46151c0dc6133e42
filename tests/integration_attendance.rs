//! Attendance marking and reporting against a database provisioned per
//! test by `sqlx::test`.

mod common;

use axum::http::StatusCode;
use common::{
    create_stream, create_student, create_subject, create_teacher, enroll, json_body, send,
    test_app,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_and_report_attendance(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let student = create_student(&pool).await;
    let stream = create_stream(&pool, teacher.id, "Science").await;
    let subject = create_subject(&pool, stream, "Physics").await;
    enroll(&pool, student.id, subject).await;
    let app = test_app(pool);

    let uri = format!("/api/teacher/subjects/{}/attendance", subject);
    for (date, status) in [
        ("2024-01-05", "present"),
        ("2024-01-08", "late"),
        ("2024-02-10", "absent"),
    ] {
        let response = send(
            &app,
            "POST",
            &uri,
            Some(&teacher.token()),
            Some(json!({
                "date": date,
                "records": [{ "student_id": student.id, "status": status }]
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{date}");
        assert_eq!(json_body(response).await["marked_count"], 1);
    }

    // Re-marking a day replaces the status.
    let response = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token()),
        Some(json!({
            "date": "2024-01-08",
            "records": [{ "student_id": student.id, "status": "present" }]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        "GET",
        "/api/student/attendance?month=1&year=2024",
        Some(&student.token()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["summary"]["total"], 2);
    assert_eq!(report["summary"]["present"], 2);
    assert_eq!(report["summary"]["percentage"], 100);
    assert_eq!(report["records"][0]["date"], "2024-01-08");

    let response = send(&app, "GET", &uri, Some(&teacher.token()), None).await;
    let report = json_body(response).await;
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["percentage"], 67);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_marking_unenrolled_student_is_forbidden(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let enrolled = create_student(&pool).await;
    let outsider = create_student(&pool).await;
    let stream = create_stream(&pool, teacher.id, "Science").await;
    let subject = create_subject(&pool, stream, "Physics").await;
    enroll(&pool, enrolled.id, subject).await;
    let app = test_app(pool.clone());

    let uri = format!("/api/teacher/subjects/{}/attendance", subject);
    let response = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token()),
        Some(json!({
            "date": "2024-03-01",
            "records": [
                { "student_id": enrolled.id, "status": "present" },
                { "student_id": outsider.id, "status": "present" }
            ]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains(&outsider.id.to_string()));

    // Nothing is written when any student is rejected.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_foreign_teacher_cannot_mark_or_read(pool: PgPool) {
    let owner = create_teacher(&pool).await;
    let other = create_teacher(&pool).await;
    let stream = create_stream(&pool, owner.id, "Science").await;
    let subject = create_subject(&pool, stream, "Physics").await;
    let app = test_app(pool);

    let uri = format!("/api/teacher/subjects/{}/attendance", subject);
    let response = send(&app, "GET", &uri, Some(&other.token()), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/teacher/subjects/{}/attendance", uuid::Uuid::new_v4());
    let response = send(&app, "GET", &uri, Some(&other.token()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_subject_attendance_requires_enrollment(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let student = create_student(&pool).await;
    let stream = create_stream(&pool, teacher.id, "Science").await;
    let subject = create_subject(&pool, stream, "Physics").await;
    let app = test_app(pool);

    let uri = format!("/api/student/subjects/{}/attendance", subject);
    let response = send(&app, "GET", &uri, Some(&student.token()), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/student/attendance?subject_id={}", subject);
    let response = send(&app, "GET", &uri, Some(&student.token()), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_limit_truncates_records_but_not_counts(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let student = create_student(&pool).await;
    let stream = create_stream(&pool, teacher.id, "Science").await;
    let subject = create_subject(&pool, stream, "Chemistry").await;
    enroll(&pool, student.id, subject).await;
    let app = test_app(pool);

    let uri = format!("/api/teacher/subjects/{}/attendance", subject);
    for (date, status) in [
        ("2024-03-04", "present"),
        ("2024-03-05", "absent"),
        ("2024-03-06", "late"),
        ("2023-03-06", "absent"),
    ] {
        let response = send(
            &app,
            "POST",
            &uri,
            Some(&teacher.token()),
            Some(json!({
                "date": date,
                "records": [{ "student_id": student.id, "status": status }]
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{date}");
    }

    let response = send(
        &app,
        "GET",
        &format!("{}?month=3&year=2024&limit=1", uri),
        Some(&teacher.token()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["absent"], 1);
    assert_eq!(report["summary"]["percentage"], 67);
    assert_eq!(report["records"].as_array().unwrap().len(), 1);
    assert_eq!(report["records"][0]["date"], "2024-03-06");

    // month without year spans every year
    let response = send(
        &app,
        "GET",
        "/api/student/attendance?month=3",
        Some(&student.token()),
        None,
    )
    .await;
    let report = json_body(response).await;
    assert_eq!(report["summary"]["total"], 4);
    assert_eq!(report["records"][3]["date"], "2023-03-06");
}
