//! Database seeding.
//!
//! Builds a full school: teachers, their streams and subjects, students
//! enrolled stream-wide, and a few weeks of attendance. Every seeded
//! account uses the [`SEED_EMAIL_DOMAIN`] so `clear_all` can remove them.

pub mod attendance;
pub mod models;
pub mod streams;
pub mod users;

use std::time::Instant;

use rollcall_core::hash_password_with_cost;
use sqlx::PgPool;

pub use models::{SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig, StreamsPerTeacher};

// bcrypt's minimum cost
const SEED_BCRYPT_COST: u32 = 4;

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    let password_hash = hash_password_with_cost(SEED_PASSWORD, SEED_BCRYPT_COST)
        .map_err(|e| anyhow::anyhow!(e.message()))?;

    println!("👩‍🏫 Seeding {} teachers...", config.num_teachers);
    let teachers = users::generate_teachers(config.num_teachers, &password_hash);
    let teacher_ids = users::insert_users_batch(db, &teachers).await?;

    let layout = &config.streams_per_teacher;
    let streams = streams::seed_streams(
        db,
        &teacher_ids,
        layout.count,
        layout.subjects_per_stream,
    )
    .await?;

    println!("🎓 Seeding {} students...", config.total_students());
    let students =
        users::generate_students(streams.len(), layout.students_per_stream, &password_hash);
    let student_ids = users::insert_users_batch(db, &students).await?;

    let enrollments =
        streams::enroll_students(db, &streams, &student_ids, layout.students_per_stream).await?;

    attendance::seed_attendance(db, &enrollments, config.attendance_days).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("   Every seeded account uses the password '{}'", SEED_PASSWORD);

    Ok(())
}

pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let deleted = users::clear_users(db).await?;
    println!("\n✅ Cleared {} seeded accounts and their data", deleted);
    Ok(())
}
