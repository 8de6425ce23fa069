//! Demo data for local development.
//!
//! A demo run creates one school year with an active GANJIL semester, classes with a
//! homeroom teacher each, students with complete (and a few incomplete) records, and
//! empty target classes in the following year to promote into.

pub mod catalog;
pub mod models;
pub mod students;

pub use models::{DemoYears, SeedConfig};

use edurapor_models::TeacherId;
use sqlx::PgPool;
use std::time::Instant;

/// Summary of a finished demo run.
#[derive(Debug)]
pub struct SeedSummary {
    pub years: DemoYears,
    pub homerooms: Vec<TeacherId>,
    pub students: usize,
    pub incomplete_students: usize,
}

pub async fn seed_demo(db: &PgPool, config: SeedConfig) -> Result<SeedSummary, sqlx::Error> {
    let start_time = Instant::now();
    println!("🌱 Seeding demo data for {}/{}...", config.tahun_mulai, config.tahun_mulai + 1);

    let years = catalog::seed_academic_years(db, config.tahun_mulai).await?;
    let programs = catalog::seed_programs(db).await?;
    let subjects = catalog::seed_subjects(db).await?;

    let homeroom_count = catalog::GRADES.len() * programs.len() * config.classes_per_program;
    let homerooms = catalog::seed_teachers(db, homeroom_count).await?;

    let (sources, targets) =
        catalog::plan_classes(&years, &programs, config.classes_per_program, &homerooms);
    let source_ids = catalog::insert_classes(db, &sources, &subjects).await?;
    let target_ids = catalog::insert_classes(db, &targets, &subjects).await?;
    println!(
        "   ✓ {} classes with homerooms, {} promotion target classes",
        source_ids.len(),
        target_ids.len()
    );

    let seeds = students::generate_students(&source_ids, config.students_per_class);
    let student_ids = students::insert_students(db, &seeds).await?;
    let incomplete_students = students::seed_records(
        db,
        years.ganjil,
        &student_ids,
        &subjects,
        config.incomplete_ratio,
    )
    .await?;

    println!("✅ Demo data seeded in {:?}", start_time.elapsed());

    Ok(SeedSummary {
        years,
        homerooms,
        students: student_ids.len(),
        incomplete_students,
    })
}

/// Removes all school data and clears the active academic year.
pub async fn clear_all(db: &PgPool) -> Result<(), sqlx::Error> {
    let start_time = Instant::now();
    println!("🗑️  Clearing all data...");

    let mut tx = db.begin().await?;
    for table in [
        "promotion_history",
        "behavior_records",
        "final_scores",
        "scores",
        "students",
        "class_subjects",
        "classes",
        "subjects",
        "teachers",
        "programs",
    ] {
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        println!("   ✓ {table}: {deleted}");
    }

    sqlx::query("UPDATE app_settings SET active_academic_year_id = NULL, updated_at = NOW()")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM academic_years")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    println!("✅ Cleared in {:?}", start_time.elapsed());
    Ok(())
}

/// A homeroom teacher and the class they lead in the active academic year.
#[derive(Debug, sqlx::FromRow)]
pub struct HomeroomRow {
    pub teacher_id: TeacherId,
    pub name: String,
    pub email: String,
    pub nama_kelas: String,
}

pub async fn list_homerooms(db: &PgPool) -> Result<Vec<HomeroomRow>, sqlx::Error> {
    sqlx::query_as::<_, HomeroomRow>(
        r#"SELECT t.id AS teacher_id, t.name, t.email, c.nama_kelas
           FROM classes c
           JOIN teachers t ON t.id = c.homeroom_teacher_id
           JOIN app_settings s ON s.active_academic_year_id = c.academic_year_id
           ORDER BY c.nama_kelas"#,
    )
    .fetch_all(db)
    .await
}
