//! Students and their semester records (scores, final scores, behavior).

use edurapor_models::{AcademicYearId, ClassId, StudentId, SubjectId};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::time::Instant;

use super::models::{
    BehaviorSeed, FinalScoreSeed, RecordBatch, ScoreSeed, StudentRecords, StudentSeed,
};

// Keeps multi-row inserts well under the Postgres bind-parameter limit.
const BATCH_SIZE: usize = 1000;

const SEMESTER_DAYS: i32 = 110;
const SIKAP: [&str; 3] = ["A", "B", "C"];

/// Generates students for each class in parallel using Rayon
pub fn generate_students(class_ids: &[ClassId], students_per_class: usize) -> Vec<StudentSeed> {
    // Random per run, so repeated seeding rarely collides on NISN.
    let prefix: u32 = rand::thread_rng().gen_range(100..1000);

    class_ids
        .par_iter()
        .enumerate()
        .flat_map(|(class_idx, &class_id)| {
            (0..students_per_class)
                .map(|student_idx| {
                    let first_name: String = FirstName().fake();
                    let last_name: String = LastName().fake();
                    StudentSeed {
                        nama_lengkap: format!("{} {}", first_name, last_name),
                        nisn: nisn_for(prefix, class_idx, student_idx),
                        class_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn nisn_for(prefix: u32, class_idx: usize, student_idx: usize) -> String {
    format!("{prefix:03}{:03}{:04}", class_idx % 1000, student_idx % 10_000)
}

/// Scores for every subject, a final score per subject and one behavior row.
///
/// With `incomplete` set, one subject is left without a UAS score and without a final
/// score, which makes the student fail semester validation.
pub fn generate_records(
    student_id: StudentId,
    subjects: &[SubjectId],
    incomplete: bool,
) -> StudentRecords {
    let mut rng = rand::thread_rng();
    let skipped = if incomplete && !subjects.is_empty() {
        Some(rng.gen_range(0..subjects.len()))
    } else {
        None
    };

    let mut records = StudentRecords::default();

    for (idx, &subject_id) in subjects.iter().enumerate() {
        let uts: f64 = rng.gen_range(55.0..98.0);
        records.scores.push(ScoreSeed {
            student_id,
            subject_id,
            kind: "UTS",
            value: round1(uts),
        });

        if skipped == Some(idx) {
            continue;
        }

        let uas: f64 = rng.gen_range(55.0..98.0);
        records.scores.push(ScoreSeed {
            student_id,
            subject_id,
            kind: "UAS",
            value: round1(uas),
        });
        records.final_scores.push(FinalScoreSeed {
            student_id,
            subject_id,
            value: round1(uts * 0.4 + uas * 0.6),
        });
    }

    let sakit = rng.gen_range(0..5);
    let izin = rng.gen_range(0..4);
    let alpa = rng.gen_range(0..8);
    records.behavior = Some(BehaviorSeed {
        student_id,
        sikap: SIKAP[rng.gen_range(0..SIKAP.len())],
        hadir: SEMESTER_DAYS - sakit - izin - alpa,
        sakit,
        izin,
        alpa,
    });

    records
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub async fn insert_students(
    db: &PgPool,
    students: &[StudentSeed],
) -> Result<Vec<StudentId>, sqlx::Error> {
    let start_time = Instant::now();
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(students.len());

    for chunk in students.chunks(BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO students (nama_lengkap, nisn, current_class_id) ",
        );
        builder.push_values(chunk, |mut row, student| {
            row.push_bind(&student.nama_lengkap)
                .push_bind(&student.nisn)
                .push_bind(student.class_id);
        });
        builder.push(" RETURNING id");

        let chunk_ids = builder
            .build_query_scalar::<StudentId>()
            .fetch_all(&mut *tx)
            .await?;
        ids.extend(chunk_ids);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

/// Generates and inserts the records of `students` for one semester.
///
/// Returns the number of students seeded with incomplete records.
pub async fn seed_records(
    db: &PgPool,
    academic_year_id: AcademicYearId,
    students: &[StudentId],
    subjects: &[SubjectId],
    incomplete_ratio: f64,
) -> Result<usize, sqlx::Error> {
    let start_time = Instant::now();
    let incomplete_every = incomplete_stride(incomplete_ratio);

    let generated: Vec<(bool, StudentRecords)> = students
        .par_iter()
        .enumerate()
        .map(|(idx, &student_id)| {
            let incomplete = incomplete_every.is_some_and(|every| idx % every == 0);
            (incomplete, generate_records(student_id, subjects, incomplete))
        })
        .collect();

    let mut batch = RecordBatch::default();
    let mut incomplete_count = 0;
    for (incomplete, records) in generated {
        if incomplete {
            incomplete_count += 1;
        }
        batch.push(records);
    }

    let mut tx = db.begin().await?;
    insert_scores(&mut tx, academic_year_id, &batch.scores).await?;
    insert_final_scores(&mut tx, academic_year_id, &batch.final_scores).await?;
    insert_behavior(&mut tx, academic_year_id, &batch.behavior).await?;
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} scores, {} final scores, {} behavior records in {:?} ({} incomplete)",
        batch.scores.len(),
        batch.final_scores.len(),
        batch.behavior.len(),
        start_time.elapsed(),
        incomplete_count
    );

    Ok(incomplete_count)
}

/// Every n-th student is incomplete; `None` when the ratio is zero.
fn incomplete_stride(ratio: f64) -> Option<usize> {
    if ratio <= 0.0 {
        return None;
    }
    Some(((1.0 / ratio).round() as usize).max(1))
}

async fn insert_scores(
    tx: &mut Transaction<'_, Postgres>,
    academic_year_id: AcademicYearId,
    scores: &[ScoreSeed],
) -> Result<(), sqlx::Error> {
    for chunk in scores.chunks(BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO scores (student_id, subject_id, academic_year_id, kind, value) ",
        );
        builder.push_values(chunk, |mut row, score| {
            row.push_bind(score.student_id)
                .push_bind(score.subject_id)
                .push_bind(academic_year_id)
                .push_bind(score.kind)
                .push_bind(score.value);
        });
        builder.build().execute(&mut **tx).await?;
    }
    Ok(())
}

async fn insert_final_scores(
    tx: &mut Transaction<'_, Postgres>,
    academic_year_id: AcademicYearId,
    final_scores: &[FinalScoreSeed],
) -> Result<(), sqlx::Error> {
    for chunk in final_scores.chunks(BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO final_scores (student_id, subject_id, academic_year_id, value) ",
        );
        builder.push_values(chunk, |mut row, score| {
            row.push_bind(score.student_id)
                .push_bind(score.subject_id)
                .push_bind(academic_year_id)
                .push_bind(score.value);
        });
        builder.build().execute(&mut **tx).await?;
    }
    Ok(())
}

async fn insert_behavior(
    tx: &mut Transaction<'_, Postgres>,
    academic_year_id: AcademicYearId,
    behavior: &[BehaviorSeed],
) -> Result<(), sqlx::Error> {
    for chunk in behavior.chunks(BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO behavior_records (student_id, academic_year_id, sikap, hadir, sakit, izin, alpa) ",
        );
        builder.push_values(chunk, |mut row, record| {
            row.push_bind(record.student_id)
                .push_bind(academic_year_id)
                .push_bind(record.sikap)
                .push_bind(record.hadir)
                .push_bind(record.sakit)
                .push_bind(record.izin)
                .push_bind(record.alpa);
        });
        builder.build().execute(&mut **tx).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects(n: u128) -> Vec<SubjectId> {
        (1..=n).map(SubjectId::from_u128).collect()
    }

    #[test]
    fn test_complete_records_cover_every_subject() {
        let records = generate_records(StudentId::from_u128(1), &subjects(4), false);

        assert_eq!(records.scores.len(), 8);
        assert_eq!(records.final_scores.len(), 4);
        let behavior = records.behavior.expect("behavior");
        assert_eq!(
            behavior.hadir + behavior.sakit + behavior.izin + behavior.alpa,
            SEMESTER_DAYS
        );
    }

    #[test]
    fn test_incomplete_records_skip_one_uas_and_final() {
        let records = generate_records(StudentId::from_u128(1), &subjects(4), true);

        let uts = records.scores.iter().filter(|s| s.kind == "UTS").count();
        let uas = records.scores.iter().filter(|s| s.kind == "UAS").count();
        assert_eq!(uts, 4);
        assert_eq!(uas, 3);
        assert_eq!(records.final_scores.len(), 3);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let records = generate_records(StudentId::from_u128(1), &subjects(6), false);
        assert!(records.scores.iter().all(|s| (0.0..=100.0).contains(&s.value)));
        assert!(records.final_scores.iter().all(|s| (0.0..=100.0).contains(&s.value)));
    }

    #[test]
    fn test_incomplete_stride() {
        assert_eq!(incomplete_stride(0.0), None);
        assert_eq!(incomplete_stride(0.1), Some(10));
        assert_eq!(incomplete_stride(0.25), Some(4));
        assert_eq!(incomplete_stride(1.0), Some(1));
    }

    #[test]
    fn test_generate_students_per_class() {
        let classes = [ClassId::from_u128(1), ClassId::from_u128(2)];
        let students = generate_students(&classes, 3);

        assert_eq!(students.len(), 6);
        assert_eq!(students.iter().filter(|s| s.class_id == classes[0]).count(), 3);
        assert!(students.iter().all(|s| s.nisn.len() == 10));
    }
}
