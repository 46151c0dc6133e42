//! Streams, subjects and enrollments against a database provisioned per
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
async fn test_teacher_creates_stream_and_subjects(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let app = test_app(pool);
    let token = teacher.token();

    let response = send(
        &app,
        "POST",
        "/api/teacher/streams",
        Some(&token),
        Some(json!({ "name": "Science", "description": "Senior science class" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let stream = json_body(response).await;
    let stream_id = stream["id"].as_str().unwrap().to_string();

    let uri = format!("/api/teacher/streams/{}/subjects", stream_id);
    let response = send(&app, "POST", &uri, Some(&token), Some(json!({ "name": "Physics" }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "POST", &uri, Some(&token), Some(json!({ "name": "Physics" }))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "GET", "/api/teacher/streams", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let streams = json_body(response).await;
    assert_eq!(streams.as_array().unwrap().len(), 1);
    assert_eq!(streams[0]["subject_count"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_touch_foreign_stream(pool: PgPool) {
    let owner = create_teacher(&pool).await;
    let other = create_teacher(&pool).await;
    let stream = create_stream(&pool, owner.id, "Arts").await;
    let app = test_app(pool);

    let uri = format!("/api/teacher/streams/{}", stream);
    let response = send(&app, "GET", &uri, Some(&other.token()), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/teacher/streams/{}", uuid::Uuid::new_v4());
    let response = send(&app, "GET", &uri, Some(&other.token()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stream_enrollment_fills_missing_subjects_only(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let student = create_student(&pool).await;
    let stream = create_stream(&pool, teacher.id, "Science").await;
    let physics = create_subject(&pool, stream, "Physics").await;
    create_subject(&pool, stream, "Chemistry").await;
    enroll(&pool, student.id, physics).await;

    let app = test_app(pool);
    let uri = format!("/api/teacher/streams/{}/enrollments", stream);

    let response = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token()),
        Some(json!({ "registration_number": student.registration_number })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["enrolled_count"], 1);

    let response = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token()),
        Some(json!({ "student_id": student.id })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "GET", "/api/student/subjects", Some(&student.token()), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);

    let uri = format!("/api/teacher/streams/{}/enrollments/{}", stream, student.id);
    let response = send(&app, "DELETE", &uri, Some(&teacher.token()), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["removed_count"], 2);

    let response = send(&app, "DELETE", &uri, Some(&teacher.token()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stream_without_subjects_rejects_enrollment(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let student = create_student(&pool).await;
    let stream = create_stream(&pool, teacher.id, "Empty").await;
    let app = test_app(pool);

    let uri = format!("/api/teacher/streams/{}/enrollments", stream);
    let response = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token()),
        Some(json!({ "student_id": student.id })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enrolling_unknown_student_is_not_found(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let stream = create_stream(&pool, teacher.id, "Science").await;
    let subject = create_subject(&pool, stream, "Physics").await;
    let app = test_app(pool);

    let uri = format!("/api/teacher/subjects/{}/enrollments", subject);
    let response = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token()),
        Some(json!({ "registration_number": "NOBODY-001" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_stream_view_requires_enrollment(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let enrolled = create_student(&pool).await;
    let outsider = create_student(&pool).await;
    let stream = create_stream(&pool, teacher.id, "Science").await;
    let subject = create_subject(&pool, stream, "Physics").await;
    enroll(&pool, enrolled.id, subject).await;
    let app = test_app(pool);

    let response = send(&app, "GET", "/api/student/streams", Some(&enrolled.token()), None).await;
    let streams = json_body(response).await;
    assert_eq!(streams.as_array().unwrap().len(), 1);
    assert_eq!(streams[0]["enrolled_subjects"], 1);

    let uri = format!("/api/student/streams/{}/attendance", stream);
    let response = send(&app, "GET", &uri, Some(&outsider.token()), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "GET", &uri, Some(&enrolled.token()), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_directory_lookup(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let student = create_student(&pool).await;
    let app = test_app(pool);

    let uri = format!(
        "/api/teacher/students?registration_number={}",
        student.registration_number.as_deref().unwrap()
    );
    let response = send(&app, "GET", &uri, Some(&teacher.token()), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"][0]["id"], student.id.to_string());
    assert_eq!(page["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_directory_is_paginated(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    for _ in 0..5 {
        create_student(&pool).await;
    }
    let app = test_app(pool);

    let response = send(
        &app,
        "GET",
        "/api/teacher/students?page=2&limit=2",
        Some(&teacher.token()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["meta"]["page"], 2);
    assert_eq!(page["meta"]["total"], 5);
    assert_eq!(page["meta"]["total_pages"], 3);
    assert_eq!(page["meta"]["has_more"], true);

    let response = send(
        &app,
        "GET",
        "/api/teacher/students?page=3&limit=2",
        Some(&teacher.token()),
        None,
    )
    .await;
    let page = json_body(response).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["meta"]["has_more"], false);
}
