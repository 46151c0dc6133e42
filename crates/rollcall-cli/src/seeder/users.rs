//! User seeding.
//!
//! Generates teachers and students with fake names in parallel, then
//! inserts them with their role rows in batched statements.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::Name;
use rand::Rng;
use rayon::prelude::*;
use rollcall_models::UserRole;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};

// 4 bind parameters per user row
const BATCH_SIZE: usize = 1000;

pub fn generate_teachers(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_user(UserRole::Teacher, 0, idx, password_hash))
        .collect()
}

/// Generates `per_group` students for each of `groups` streams.
pub fn generate_students(groups: usize, per_group: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..groups)
        .into_par_iter()
        .flat_map(|group_idx| {
            (0..per_group)
                .map(|idx| generate_user(UserRole::Student, group_idx, idx, password_hash))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn generate_user(role: UserRole, group_idx: usize, user_idx: usize, password_hash: &str) -> UserSeed {
    let name: String = Name().fake();
    let serial = group_idx * 1000 + user_idx;

    let local: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".");

    let email = format!("{}+{}{}@{}", local, role, serial, SEED_EMAIL_DOMAIN);
    let registration_number = match role {
        UserRole::Student => Some(format!("SEED-{:06}", serial)),
        UserRole::Teacher => None,
    };

    UserSeed {
        name,
        email,
        password_hash: password_hash.to_string(),
        role,
        mobile_number: random_mobile_number(),
        registration_number,
    }
}

fn random_mobile_number() -> String {
    let mut rng = rand::thread_rng();
    format!("080{:08}", rng.gen_range(0..100_000_000u32))
}

/// Inserts users and their role rows in one transaction. Returns ids in
/// the order of `users`.
pub async fn insert_users_batch(db: &PgPool, users: &[UserSeed]) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let chunk_ids = insert_users_chunk(&mut tx, chunk).await?;
        insert_role_rows(&mut tx, chunk, &chunk_ids).await?;
        ids.extend(chunk_ids);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> anyhow::Result<Vec<Uuid>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO users (name, email, password, role) ");
    builder.push_values(users, |mut row, user| {
        row.push_bind(&user.name)
            .push_bind(&user.email)
            .push_bind(&user.password_hash)
            .push_bind(user.role);
    });
    builder.push(" RETURNING id");

    let ids: Vec<Uuid> = builder.build_query_scalar::<Uuid>().fetch_all(&mut **tx).await?;
    Ok(ids)
}

async fn insert_role_rows(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
    ids: &[Uuid],
) -> anyhow::Result<()> {
    let rows: Vec<(&Uuid, &UserSeed)> = ids.iter().zip(users).collect();

    let students: Vec<_> = rows
        .iter()
        .filter_map(|(id, user)| {
            user.registration_number
                .as_deref()
                .map(|number| (*id, number, user.mobile_number.as_str()))
        })
        .collect();
    let teachers: Vec<_> = rows
        .iter()
        .filter(|(_, user)| user.role == UserRole::Teacher)
        .map(|(id, user)| (*id, user.mobile_number.as_str()))
        .collect();

    if !students.is_empty() {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO students (user_id, registration_number, mobile_number) ",
        );
        builder.push_values(students, |mut row, (id, number, mobile)| {
            row.push_bind(*id).push_bind(number).push_bind(mobile);
        });
        builder.build().execute(&mut **tx).await?;
    }

    if !teachers.is_empty() {
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO teachers (user_id, mobile_number) ");
        builder.push_values(teachers, |mut row, (id, mobile)| {
            row.push_bind(*id).push_bind(mobile);
        });
        builder.build().execute(&mut **tx).await?;
    }

    Ok(())
}

/// Deletes every account on the seed domain. Streams, enrollments and
/// attendance cascade.
pub async fn clear_users(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE ('%@' || $1)")
        .bind(SEED_EMAIL_DOMAIN)
        .execute(db)
        .await?
        .rows_affected();

    println!("   ✓ Deleted {} users in {:?}", deleted, start_time.elapsed());

    Ok(deleted)
}
