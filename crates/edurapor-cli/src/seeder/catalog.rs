//! Academic years, programs, subjects, teachers and classes.

use edurapor_models::{AcademicYearId, ClassId, ProgramId, Semester, SubjectId, TeacherId};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{ClassSeed, DemoYears, TeacherSeed};

pub const PROGRAMS: [&str; 2] = ["IPA", "IPS"];

pub const SUBJECTS: [(&str, &str); 6] = [
    ("MTK", "Matematika"),
    ("BIN", "Bahasa Indonesia"),
    ("BIG", "Bahasa Inggris"),
    ("PKN", "Pendidikan Pancasila"),
    ("SEJ", "Sejarah"),
    ("PJOK", "Pendidikan Jasmani"),
];

/// Grade pairs: a class in the seeded year and the grade its students are promoted into.
pub const GRADES: [(&str, &str); 2] = [("X", "XI"), ("XI", "XII")];

async fn upsert_academic_year(
    tx: &mut Transaction<'_, Postgres>,
    tahun_mulai: i32,
    semester: Semester,
) -> Result<AcademicYearId, sqlx::Error> {
    sqlx::query_scalar::<_, AcademicYearId>(
        r#"INSERT INTO academic_years (tahun_mulai, tahun_selesai, semester)
           VALUES ($1, $2, $3)
           ON CONFLICT (tahun_mulai, semester) DO UPDATE SET updated_at = NOW()
           RETURNING id"#,
    )
    .bind(tahun_mulai)
    .bind(tahun_mulai + 1)
    .bind(semester.as_str())
    .fetch_one(&mut **tx)
    .await
}

/// Creates GANJIL and GENAP of `tahun_mulai` plus GANJIL of the next year, and makes the
/// first one active.
pub async fn seed_academic_years(
    db: &PgPool,
    tahun_mulai: i32,
) -> Result<DemoYears, sqlx::Error> {
    let mut tx = db.begin().await?;

    let years = DemoYears {
        ganjil: upsert_academic_year(&mut tx, tahun_mulai, Semester::Ganjil).await?,
        genap: upsert_academic_year(&mut tx, tahun_mulai, Semester::Genap).await?,
        next_ganjil: upsert_academic_year(&mut tx, tahun_mulai + 1, Semester::Ganjil).await?,
    };

    sqlx::query(
        r#"INSERT INTO app_settings (id, active_academic_year_id, updated_at)
           VALUES (TRUE, $1, NOW())
           ON CONFLICT (id) DO UPDATE
           SET active_academic_year_id = EXCLUDED.active_academic_year_id, updated_at = NOW()"#,
    )
    .bind(years.ganjil)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    println!(
        "   ✓ Academic years {}/{} GANJIL (active), GENAP and {}/{} GANJIL",
        tahun_mulai,
        tahun_mulai + 1,
        tahun_mulai + 1,
        tahun_mulai + 2
    );

    Ok(years)
}

pub async fn seed_programs(db: &PgPool) -> Result<Vec<(ProgramId, &'static str)>, sqlx::Error> {
    let mut programs = Vec::with_capacity(PROGRAMS.len());
    for name in PROGRAMS {
        let id = sqlx::query_scalar::<_, ProgramId>(
            r#"INSERT INTO programs (name) VALUES ($1)
               ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
               RETURNING id"#,
        )
        .bind(name)
        .fetch_one(db)
        .await?;
        programs.push((id, name));
    }
    Ok(programs)
}

pub async fn seed_subjects(db: &PgPool) -> Result<Vec<SubjectId>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new("INSERT INTO subjects (code, name) ");
    builder.push_values(SUBJECTS, |mut row, (code, name)| {
        row.push_bind(code).push_bind(name);
    });
    builder.push(" ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name RETURNING id");

    let ids = builder
        .build_query_scalar::<SubjectId>()
        .fetch_all(db)
        .await?;

    println!("   ✓ {} subjects", ids.len());
    Ok(ids)
}

/// Generates teacher names and emails in parallel using Rayon
pub fn generate_teachers(count: usize) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let suffix = Uuid::new_v4().simple().to_string();

            TeacherSeed {
                email: format!(
                    "{}.{}+{}{}@sekolah.sch.id",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    idx,
                    &suffix[..6]
                ),
                name: format!("{} {}", first_name, last_name),
            }
        })
        .collect()
}

pub async fn seed_teachers(db: &PgPool, count: usize) -> Result<Vec<TeacherId>, sqlx::Error> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let start_time = Instant::now();
    let teachers = generate_teachers(count);

    let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO teachers (name, email) ");
    builder.push_values(&teachers, |mut row, teacher| {
        row.push_bind(&teacher.name).push_bind(&teacher.email);
    });
    builder.push(" RETURNING id");

    let ids = builder
        .build_query_scalar::<TeacherId>()
        .fetch_all(db)
        .await?;

    println!(
        "   ✓ Inserted {} teachers in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

/// Lays out the seeded year's classes and their promotion targets.
///
/// Source classes get a homeroom teacher each, taken from `homerooms` in order; target
/// classes in the next year have none. Returns `(source, targets)`.
pub fn plan_classes(
    years: &DemoYears,
    programs: &[(ProgramId, &'static str)],
    classes_per_program: usize,
    homerooms: &[TeacherId],
) -> (Vec<ClassSeed>, Vec<ClassSeed>) {
    let mut sources = Vec::new();
    let mut targets = Vec::new();
    let mut homerooms = homerooms.iter().copied();

    for (grade, next_grade) in GRADES {
        for &(program_id, program) in programs {
            for n in 1..=classes_per_program {
                sources.push(ClassSeed {
                    nama_kelas: format!("{grade} {program} {n}"),
                    academic_year_id: years.ganjil,
                    program_id,
                    homeroom_teacher_id: homerooms.next(),
                });
                targets.push(ClassSeed {
                    nama_kelas: format!("{next_grade} {program} {n}"),
                    academic_year_id: years.next_ganjil,
                    program_id,
                    homeroom_teacher_id: None,
                });
            }
        }
    }

    (sources, targets)
}

/// Inserts classes and attaches every subject to each of them.
pub async fn insert_classes(
    db: &PgPool,
    classes: &[ClassSeed],
    subjects: &[SubjectId],
) -> Result<Vec<ClassId>, sqlx::Error> {
    if classes.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = db.begin().await?;

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO classes (nama_kelas, academic_year_id, program_id, homeroom_teacher_id) ",
    );
    builder.push_values(classes, |mut row, class| {
        row.push_bind(&class.nama_kelas)
            .push_bind(class.academic_year_id)
            .push_bind(class.program_id)
            .push_bind(class.homeroom_teacher_id);
    });
    builder.push(
        " ON CONFLICT (academic_year_id, nama_kelas) DO UPDATE \
          SET homeroom_teacher_id = EXCLUDED.homeroom_teacher_id RETURNING id",
    );

    let ids = builder
        .build_query_scalar::<ClassId>()
        .fetch_all(&mut *tx)
        .await?;

    if !subjects.is_empty() {
        let pairs: Vec<(ClassId, SubjectId)> = ids
            .iter()
            .flat_map(|&class_id| subjects.iter().map(move |&subject_id| (class_id, subject_id)))
            .collect();

        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO class_subjects (class_id, subject_id) ");
        builder.push_values(&pairs, |mut row, (class_id, subject_id)| {
            row.push_bind(*class_id).push_bind(*subject_id);
        });
        builder.push(" ON CONFLICT DO NOTHING");
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(ids)
}
