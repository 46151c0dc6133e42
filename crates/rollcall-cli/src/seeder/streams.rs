//! Stream, subject and enrollment seeding.

use std::time::Instant;

use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::seq::SliceRandom;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{StreamSeed, SubjectSeed};

const STREAM_NAMES: &[&str] = &[
    "Science", "Arts", "Commerce", "Technical", "Humanities", "Languages",
];

const SUBJECT_NAMES: &[&str] = &[
    "Mathematics", "English", "Physics", "Chemistry", "Biology", "History",
    "Geography", "Economics", "Literature", "Computer Studies", "Accounting",
    "Civic Education",
];

const BATCH_SIZE: usize = 2000;

/// A seeded stream and the ids of its subjects.
pub struct SeededStream {
    pub id: Uuid,
    pub subject_ids: Vec<Uuid>,
}

pub fn generate_streams(teacher_ids: &[Uuid], per_teacher: usize) -> Vec<StreamSeed> {
    teacher_ids
        .iter()
        .flat_map(|&teacher_id| {
            (0..per_teacher).map(move |idx| StreamSeed {
                name: format!(
                    "{} {}",
                    STREAM_NAMES[idx % STREAM_NAMES.len()],
                    idx / STREAM_NAMES.len() + 1
                ),
                description: Some(Sentence(3..8).fake()),
                teacher_id,
            })
        })
        .collect()
}

/// Picks `count` distinct subject names per stream. Names repeat with a
/// numeric suffix once the catalogue is exhausted.
pub fn generate_subjects(stream_ids: &[Uuid], count: usize) -> Vec<SubjectSeed> {
    let mut rng = rand::thread_rng();
    stream_ids
        .iter()
        .flat_map(|&stream_id| {
            let mut names: Vec<&str> = SUBJECT_NAMES.to_vec();
            names.shuffle(&mut rng);
            (0..count)
                .map(|idx| {
                    let base = names[idx % names.len()];
                    let name = match idx / names.len() {
                        0 => base.to_string(),
                        round => format!("{} {}", base, round + 1),
                    };
                    SubjectSeed { name, stream_id }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_streams(
    db: &PgPool,
    teacher_ids: &[Uuid],
    streams_per_teacher: usize,
    subjects_per_stream: usize,
) -> anyhow::Result<Vec<SeededStream>> {
    let start_time = Instant::now();
    println!(
        "📚 Seeding {} streams with {} subjects each...",
        teacher_ids.len() * streams_per_teacher,
        subjects_per_stream
    );

    let streams = generate_streams(teacher_ids, streams_per_teacher);
    if streams.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = db.begin().await?;

    let mut builder =
        QueryBuilder::<Postgres>::new("INSERT INTO streams (name, description, teacher_id) ");
    builder.push_values(&streams, |mut row, stream| {
        row.push_bind(&stream.name)
            .push_bind(&stream.description)
            .push_bind(stream.teacher_id);
    });
    builder.push(" RETURNING id");
    let stream_ids: Vec<Uuid> = builder
        .build_query_scalar::<Uuid>()
        .fetch_all(&mut *tx)
        .await?;

    let subjects = generate_subjects(&stream_ids, subjects_per_stream);
    let mut seeded: Vec<SeededStream> = stream_ids
        .iter()
        .map(|&id| SeededStream {
            id,
            subject_ids: Vec::with_capacity(subjects_per_stream),
        })
        .collect();

    for chunk in subjects.chunks(BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO subjects (name, stream_id) ");
        builder.push_values(chunk, |mut row, subject| {
            row.push_bind(&subject.name).push_bind(subject.stream_id);
        });
        builder.push(" RETURNING id, stream_id");
        let rows: Vec<(Uuid, Uuid)> = builder
            .build_query_as::<(Uuid, Uuid)>()
            .fetch_all(&mut *tx)
            .await?;

        for (subject_id, stream_id) in rows {
            if let Some(stream) = seeded.iter_mut().find(|s| s.id == stream_id) {
                stream.subject_ids.push(subject_id);
            }
        }
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} streams and {} subjects in {:?}",
        seeded.len(),
        subjects.len(),
        start_time.elapsed()
    );

    Ok(seeded)
}

/// Enrolls each chunk of `students_per_stream` students in every subject of
/// the matching stream.
pub async fn enroll_students(
    db: &PgPool,
    streams: &[SeededStream],
    student_ids: &[Uuid],
    students_per_stream: usize,
) -> anyhow::Result<Vec<(Uuid, Uuid)>> {
    let start_time = Instant::now();

    let pairs: Vec<(Uuid, Uuid)> = streams
        .iter()
        .zip(student_ids.chunks(students_per_stream.max(1)))
        .flat_map(|(stream, students)| {
            students.iter().flat_map(move |&student_id| {
                stream
                    .subject_ids
                    .iter()
                    .map(move |&subject_id| (student_id, subject_id))
            })
        })
        .collect();

    println!("📝 Creating {} subject enrollments...", pairs.len());

    let mut tx = db.begin().await?;
    for chunk in pairs.chunks(BATCH_SIZE) {
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO subject_enrollments (student_id, subject_id) ");
        builder.push_values(chunk, |mut row, (student_id, subject_id)| {
            row.push_bind(*student_id).push_bind(*subject_id);
        });
        builder.push(" ON CONFLICT (student_id, subject_id) DO NOTHING");
        builder.build().execute(&mut *tx).await?;
    }
    tx.commit().await?;

    println!("   ✓ Enrolled students in {:?}", start_time.elapsed());

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_subject_names_unique_within_stream() {
        let stream = Uuid::new_v4();
        let subjects = generate_subjects(&[stream], SUBJECT_NAMES.len() + 3);
        let names: HashSet<_> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), subjects.len());
    }

    #[test]
    fn test_streams_generated_per_teacher() {
        let teachers = [Uuid::new_v4(), Uuid::new_v4()];
        let streams = generate_streams(&teachers, 3);
        assert_eq!(streams.len(), 6);
        assert_eq!(
            streams.iter().filter(|s| s.teacher_id == teachers[0]).count(),
            3
        );
    }
}
