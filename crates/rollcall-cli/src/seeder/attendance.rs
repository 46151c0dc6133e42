//! Attendance history seeding.

use std::time::Instant;

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use rand::Rng;
use rayon::prelude::*;
use rollcall_models::AttendanceStatus;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

// 4 bind parameters per row
const BATCH_SIZE: usize = 5000;

pub struct AttendanceSeed {
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// The last `count` weekdays up to and including `today`, newest first.
pub fn school_days(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut day = today;
    while days.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        match day.checked_sub_days(Days::new(1)) {
            Some(previous) => day = previous,
            None => break,
        }
    }
    days
}

/// Mostly present, with roughly one day in ten late and one absent.
fn random_status<R: Rng>(rng: &mut R) -> AttendanceStatus {
    match rng.gen_range(0..10) {
        0 => AttendanceStatus::Absent,
        1 => AttendanceStatus::Late,
        _ => AttendanceStatus::Present,
    }
}

pub fn generate_attendance(enrollments: &[(Uuid, Uuid)], days: &[NaiveDate]) -> Vec<AttendanceSeed> {
    enrollments
        .par_iter()
        .flat_map(|&(student_id, subject_id)| {
            let mut rng = rand::thread_rng();
            days.iter()
                .map(|&date| AttendanceSeed {
                    student_id,
                    subject_id,
                    date,
                    status: random_status(&mut rng),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_attendance(
    db: &PgPool,
    enrollments: &[(Uuid, Uuid)],
    day_count: usize,
) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    let days = school_days(Utc::now().date_naive(), day_count);
    let records = generate_attendance(enrollments, &days);

    println!(
        "🗓️  Seeding {} attendance records over {} school days...",
        records.len(),
        days.len()
    );

    let mut inserted = 0;
    let mut tx = db.begin().await?;
    for chunk in records.chunks(BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO attendance (student_id, subject_id, date, status) ",
        );
        builder.push_values(chunk, |mut row, record| {
            row.push_bind(record.student_id)
                .push_bind(record.subject_id)
                .push_bind(record.date)
                .push_bind(record.status);
        });
        builder.push(" ON CONFLICT (student_id, subject_id, date) DO NOTHING");
        inserted += builder.build().execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} attendance records in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}
