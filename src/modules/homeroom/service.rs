use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument, warn};

use edurapor_config::PromotionConfig;
use edurapor_core::AppError;
use edurapor_models::students::round2;
use edurapor_models::{
    AcademicYear, AcademicYearId, AttendanceSummary, ClassId, HistoryKind, ProgramId, Semester,
    StudentId, SubjectId, TeacherId,
};

use crate::metrics;
use crate::modules::academic_years::service::AcademicYearService;
use crate::modules::homeroom::model::{
    AttendanceRow, AvailableClass, ClassInfo, ClassRecord, ClassSubject, HomeroomContext,
    MoveSemesterDto, MoveSemesterResponse, PromoteStudentsDto, PromoteStudentsResponse,
    PromotionHistoryEntry, PromotionRoster, RosterStudent, SemesterAverageRow, ValidationReport,
};
use crate::modules::homeroom::promotion::{
    PlannedMove, PromotionTargets, build_candidate, plan_promotion,
};
use crate::modules::homeroom::semester::{
    ensure_ganjil_source, ensure_genap_continuation, ensure_genap_source, ensure_later_year,
};
use crate::modules::homeroom::validation::{BehaviorRequirement, ScoreSheet, evaluate_roster};

const CLASS_SELECT: &str = r#"SELECT c.id, c.nama_kelas, c.academic_year_id, c.program_id,
       p.name AS program, c.homeroom_teacher_id, t.name AS homeroom_teacher
  FROM classes c
  JOIN programs p ON p.id = c.program_id
  LEFT JOIN teachers t ON t.id = c.homeroom_teacher_id"#;

pub struct HomeroomService;

impl HomeroomService {
    /// Resolves the caller's class in the active academic year.
    #[instrument(skip(db))]
    pub async fn resolve_context(
        db: &PgPool,
        teacher_id: TeacherId,
    ) -> Result<HomeroomContext, AppError> {
        let academic_year = AcademicYearService::get_active(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("No active academic year is set")))?;

        let class = sqlx::query_as::<_, ClassRecord>(&format!(
            "{} WHERE c.homeroom_teacher_id = $1 AND c.academic_year_id = $2",
            CLASS_SELECT
        ))
        .bind(teacher_id)
        .bind(academic_year.id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::not_found(anyhow!(
                "You are not the homeroom teacher of any class in {}",
                academic_year.label()
            ))
        })?;

        Ok(HomeroomContext {
            class,
            academic_year,
        })
    }

    async fn find_class(db: &PgPool, class_id: ClassId) -> Result<Option<ClassRecord>, AppError> {
        let class = sqlx::query_as::<_, ClassRecord>(&format!("{} WHERE c.id = $1", CLASS_SELECT))
            .bind(class_id)
            .fetch_optional(db)
            .await?;

        Ok(class)
    }

    /// ACTIVE students whose current class is `class_id`, ordered by name.
    async fn load_roster(db: &PgPool, class_id: ClassId) -> Result<Vec<RosterStudent>, AppError> {
        let roster = sqlx::query_as::<_, RosterStudent>(
            r#"SELECT id, nama_lengkap, nisn, status
               FROM students
               WHERE current_class_id = $1 AND status = 'ACTIVE'
               ORDER BY nama_lengkap, id"#,
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;

        Ok(roster)
    }

    async fn load_subjects(db: &PgPool, class_id: ClassId) -> Result<Vec<ClassSubject>, AppError> {
        let subjects = sqlx::query_as::<_, ClassSubject>(
            r#"SELECT s.id, s.name
               FROM class_subjects cs
               JOIN subjects s ON s.id = cs.subject_id
               WHERE cs.class_id = $1
               ORDER BY s.name, s.id"#,
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;

        Ok(subjects)
    }

    /// Semesters needing a behavior record: the evaluated one and, for GENAP, its GANJIL
    /// sibling when that year exists.
    async fn behavior_requirements(
        db: &PgPool,
        academic_year: &AcademicYear,
    ) -> Result<Vec<BehaviorRequirement>, AppError> {
        let mut requirements = vec![BehaviorRequirement {
            academic_year_id: academic_year.id,
            semester: academic_year.semester,
        }];

        if academic_year.semester == Semester::Genap
            && let Some(ganjil) = AcademicYearService::find_ganjil_of(db, academic_year.tahun_mulai).await?
        {
            requirements.push(BehaviorRequirement {
                academic_year_id: ganjil.id,
                semester: ganjil.semester,
            });
        }

        Ok(requirements)
    }

    async fn load_score_sheet(
        db: &PgPool,
        academic_year_id: AcademicYearId,
        student_ids: &[StudentId],
        behavior_years: &[AcademicYearId],
    ) -> Result<ScoreSheet, AppError> {
        let mut sheet = ScoreSheet::default();

        let scores = sqlx::query_as::<_, (StudentId, SubjectId, String)>(
            r#"SELECT student_id, subject_id, kind
               FROM scores
               WHERE academic_year_id = $1 AND student_id = ANY($2)"#,
        )
        .bind(academic_year_id)
        .bind(student_ids)
        .fetch_all(db)
        .await?;

        for (student_id, subject_id, kind) in scores {
            match kind.as_str() {
                "UTS" => sheet.record_uts(student_id, subject_id),
                "UAS" => sheet.record_uas(student_id, subject_id),
                other => warn!(kind = %other, "Ignoring score with unknown kind"),
            }
        }

        let final_scores = sqlx::query_as::<_, (StudentId, SubjectId)>(
            r#"SELECT student_id, subject_id
               FROM final_scores
               WHERE academic_year_id = $1 AND student_id = ANY($2)"#,
        )
        .bind(academic_year_id)
        .bind(student_ids)
        .fetch_all(db)
        .await?;

        for (student_id, subject_id) in final_scores {
            sheet.record_final_score(student_id, subject_id);
        }

        let behavior = sqlx::query_as::<_, (StudentId, AcademicYearId)>(
            r#"SELECT student_id, academic_year_id
               FROM behavior_records
               WHERE academic_year_id = ANY($1) AND student_id = ANY($2)"#,
        )
        .bind(behavior_years)
        .bind(student_ids)
        .fetch_all(db)
        .await?;

        for (student_id, academic_year_id) in behavior {
            sheet.record_behavior(student_id, academic_year_id);
        }

        Ok(sheet)
    }

    /// Builds the semester-completion report for `context`. Read-only.
    #[instrument(skip(db, context), fields(class_id = %context.class.id))]
    pub async fn build_report(
        db: &PgPool,
        context: &HomeroomContext,
    ) -> Result<ValidationReport, AppError> {
        let class = &context.class;
        let academic_year = &context.academic_year;

        let roster = Self::load_roster(db, class.id).await?;
        let subjects = Self::load_subjects(db, class.id).await?;
        let requirements = Self::behavior_requirements(db, academic_year).await?;

        if subjects.is_empty() && !roster.is_empty() {
            warn!(
                class_id = %class.id,
                nama_kelas = %class.nama_kelas,
                "Class has no subjects; score checks pass vacuously"
            );
        }

        let student_ids: Vec<StudentId> = roster.iter().map(|s| s.id).collect();
        let behavior_years: Vec<AcademicYearId> =
            requirements.iter().map(|r| r.academic_year_id).collect();
        let sheet =
            Self::load_score_sheet(db, academic_year.id, &student_ids, &behavior_years).await?;

        let (students, validation) = evaluate_roster(&roster, &subjects, &sheet, &requirements);

        Ok(ValidationReport {
            class_info: ClassInfo::new(class, academic_year.clone()),
            validation,
            students,
        })
    }

    #[instrument(skip(db))]
    pub async fn validate_semester_completion(
        db: &PgPool,
        teacher_id: TeacherId,
    ) -> Result<ValidationReport, AppError> {
        let context = Self::resolve_context(db, teacher_id).await?;
        let report = Self::build_report(db, &context).await?;

        info!(
            class_id = %context.class.id,
            total = report.validation.total_students,
            invalid = report.validation.invalid_students,
            "Semester completion validated"
        );
        metrics::track_semester_validation(report.validation.all_valid);

        Ok(report)
    }

    /// Loads a target class and checks that it belongs to `academic_year`.
    async fn target_class(
        db: &PgPool,
        class_id: ClassId,
        academic_year: &AcademicYear,
    ) -> Result<ClassRecord, AppError> {
        let class = Self::find_class(db, class_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Target class not found")))?;

        if class.academic_year_id != academic_year.id {
            return Err(AppError::bad_request(anyhow!(
                "Target class {} does not belong to academic year {}",
                class.nama_kelas,
                academic_year.label()
            )));
        }

        Ok(class)
    }

    /// Applies per-student advance/repeat decisions in one transaction.
    #[instrument(skip(db, dto), fields(decisions = dto.promotions.len()))]
    pub async fn promote_students(
        db: &PgPool,
        teacher_id: TeacherId,
        dto: PromoteStudentsDto,
    ) -> Result<PromoteStudentsResponse, AppError> {
        let context = Self::resolve_context(db, teacher_id).await?;
        let source_class = &context.class;
        let source_year = &context.academic_year;

        ensure_genap_source(source_year)?;

        let target_year_id = dto
            .target_academic_year_id
            .ok_or_else(|| AppError::bad_request(anyhow!("Target academic year must be selected")))?;
        let passed_class_id = dto
            .target_class_id_for_passed
            .ok_or_else(|| AppError::bad_request(anyhow!("Target class for promoted students must be selected")))?;

        let target_year = AcademicYearService::find_by_id(db, target_year_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Target academic year not found")))?;
        ensure_later_year(source_year, &target_year)?;

        let passed_class = Self::target_class(db, passed_class_id, &target_year).await?;
        if let Some(failed_class_id) = dto.target_class_id_for_failed {
            Self::target_class(db, failed_class_id, &target_year).await?;
        }

        let report = Self::build_report(db, &context).await?;
        let targets = PromotionTargets {
            passed: passed_class.id,
            failed: dto.target_class_id_for_failed,
        };

        let plan = match plan_promotion(&dto.promotions, &report, targets) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(class_id = %source_class.id, reason = ?err, "Promotion batch rejected");
                metrics::track_promotion("rejected");
                return Err(err.into_app_error());
            }
        };

        for student in &plan.acknowledged_issues {
            info!(
                student_id = %student.id,
                issues = student.issues.len(),
                "Repeating student has incomplete records; acknowledged"
            );
        }
        for student_id in &plan.unchanged {
            info!(student_id = %student_id, "Repeating student keeps current class");
        }

        let mut tx = db.begin().await?;
        lock_class(&mut tx, source_class.id).await?;

        for planned in &plan.moves {
            move_student(&mut tx, planned, source_class.id).await.inspect_err(|_| {
                metrics::track_promotion("conflict");
            })?;

            record_history(
                &mut tx,
                HistoryRow {
                    student_id: planned.student_id,
                    from_class_id: source_class.id,
                    to_class_id: planned.to_class_id,
                    from_academic_year_id: source_year.id,
                    to_academic_year_id: target_year.id,
                    naik_kelas: planned.naik_kelas,
                    kind: HistoryKind::Promotion,
                    performed_by: teacher_id,
                },
            )
            .await?;
        }

        tx.commit().await?;

        let promoted_count = plan.promoted_count();
        let repeated_count = plan.repeated_count();
        let unchanged_count = plan.unchanged.len();

        info!(
            class_id = %source_class.id,
            target_academic_year = %target_year.label(),
            promoted = promoted_count,
            repeated = repeated_count,
            unchanged = unchanged_count,
            "Promotion completed"
        );
        metrics::track_promotion("success");
        metrics::track_promoted_students("naik_kelas", promoted_count);
        metrics::track_promoted_students("mengulang", repeated_count);
        metrics::track_promoted_students("unchanged", unchanged_count);

        Ok(PromoteStudentsResponse {
            message: format!(
                "Promotion to {} completed: {} promoted, {} repeating in a new class, {} unchanged",
                target_year.label(),
                promoted_count,
                repeated_count,
                unchanged_count
            ),
            promoted_count,
            repeated_count,
            unchanged_count,
            acknowledged_issues: plan.acknowledged_issues,
        })
    }

    /// Moves the caller's whole class into the GENAP continuation of its year.
    #[instrument(skip(db))]
    pub async fn move_to_new_semester(
        db: &PgPool,
        teacher_id: TeacherId,
        dto: MoveSemesterDto,
    ) -> Result<MoveSemesterResponse, AppError> {
        let context = Self::resolve_context(db, teacher_id).await?;
        let source_class = &context.class;
        let source_year = &context.academic_year;

        ensure_ganjil_source(source_year)?;

        let target_year_id = dto
            .target_academic_year_id
            .ok_or_else(|| AppError::bad_request(anyhow!("Target academic year must be selected")))?;
        let target_year = AcademicYearService::find_by_id(db, target_year_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Target academic year not found")))?;
        ensure_genap_continuation(source_year, &target_year)?;

        let report = Self::build_report(db, &context).await?;
        if !report.validation.all_valid {
            return Err(AppError::bad_request(anyhow!(
                "{} student(s) have incomplete records for {}",
                report.validation.invalid_students,
                source_year.label()
            ))
            .with_details(serde_json::json!({ "invalidStudents": report.invalid_students() })));
        }

        let student_ids: Vec<StudentId> = report.students.iter().map(|s| s.student_id).collect();

        let mut tx = db.begin().await?;
        lock_class(&mut tx, source_class.id).await?;

        let target_class_id = find_or_create_continuation(&mut tx, source_class, &target_year).await?;

        let moved = sqlx::query_scalar::<_, StudentId>(
            r#"UPDATE students
               SET current_class_id = $1, updated_at = NOW()
               WHERE id = ANY($2) AND current_class_id = $3 AND status = 'ACTIVE'
               RETURNING id"#,
        )
        .bind(target_class_id)
        .bind(&student_ids)
        .bind(source_class.id)
        .fetch_all(&mut *tx)
        .await?;

        if moved.len() != student_ids.len() {
            warn!(
                class_id = %source_class.id,
                expected = student_ids.len(),
                moved = moved.len(),
                "Roster changed during semester move"
            );
            return Err(AppError::conflict(anyhow!(
                "The class roster changed while moving; no student was moved. Please retry"
            )));
        }

        for student_id in &moved {
            record_history(
                &mut tx,
                HistoryRow {
                    student_id: *student_id,
                    from_class_id: source_class.id,
                    to_class_id: target_class_id,
                    from_academic_year_id: source_year.id,
                    to_academic_year_id: target_year.id,
                    naik_kelas: false,
                    kind: HistoryKind::SemesterMove,
                    performed_by: teacher_id,
                },
            )
            .await?;
        }

        tx.commit().await?;

        info!(
            from_class_id = %source_class.id,
            to_class_id = %target_class_id,
            moved = moved.len(),
            "Class moved to new semester"
        );
        metrics::track_semester_move();

        Ok(MoveSemesterResponse {
            message: format!(
                "Class {} moved to {} with {} student(s)",
                source_class.nama_kelas,
                target_year.label(),
                moved.len()
            ),
            class_id: target_class_id,
            moved_students: moved.len(),
        })
    }

    /// Every academic year, newest first.
    pub async fn available_academic_years(db: &PgPool) -> Result<Vec<AcademicYear>, AppError> {
        AcademicYearService::list(db).await
    }

    /// Years a class can be promoted into: strictly after the homeroom class's year.
    #[instrument(skip(db))]
    pub async fn available_academic_years_for_promotion(
        db: &PgPool,
        teacher_id: TeacherId,
    ) -> Result<Vec<AcademicYear>, AppError> {
        let context = Self::resolve_context(db, teacher_id).await?;
        AcademicYearService::list_after(db, &context.academic_year).await
    }

    #[instrument(skip(db))]
    pub async fn available_classes(
        db: &PgPool,
        academic_year_id: AcademicYearId,
    ) -> Result<Vec<AvailableClass>, AppError> {
        AcademicYearService::get_by_id(db, academic_year_id).await?;

        let classes = sqlx::query_as::<_, AvailableClass>(
            r#"SELECT c.id, c.nama_kelas, p.name AS program,
                      COUNT(s.id) AS student_count,
                      t.name AS homeroom_teacher
               FROM classes c
               JOIN programs p ON p.id = c.program_id
               LEFT JOIN teachers t ON t.id = c.homeroom_teacher_id
               LEFT JOIN students s ON s.current_class_id = c.id AND s.status = 'ACTIVE'
               WHERE c.academic_year_id = $1
               GROUP BY c.id, c.nama_kelas, p.name, t.name
               ORDER BY c.nama_kelas"#,
        )
        .bind(academic_year_id)
        .fetch_all(db)
        .await?;

        Ok(classes)
    }

    /// Roster annotated with semester averages, attendance and smart-toggle defaults.
    #[instrument(skip(db, config))]
    pub async fn students_for_promotion(
        db: &PgPool,
        teacher_id: TeacherId,
        config: &PromotionConfig,
    ) -> Result<PromotionRoster, AppError> {
        let context = Self::resolve_context(db, teacher_id).await?;
        let academic_year = &context.academic_year;
        let roster = Self::load_roster(db, context.class.id).await?;

        let (ganjil_year, genap_year) = match academic_year.semester {
            Semester::Ganjil => (Some(academic_year.id), None),
            Semester::Genap => {
                let ganjil = AcademicYearService::find_ganjil_of(db, academic_year.tahun_mulai)
                    .await?
                    .map(|year| year.id);
                (ganjil, Some(academic_year.id))
            }
        };
        let year_ids: Vec<AcademicYearId> = [ganjil_year, genap_year].into_iter().flatten().collect();
        let student_ids: Vec<StudentId> = roster.iter().map(|s| s.id).collect();

        let averages = sqlx::query_as::<_, SemesterAverageRow>(
            r#"SELECT student_id, academic_year_id, AVG(value) AS average
               FROM final_scores
               WHERE student_id = ANY($1) AND academic_year_id = ANY($2)
               GROUP BY student_id, academic_year_id"#,
        )
        .bind(&student_ids)
        .bind(&year_ids)
        .fetch_all(db)
        .await?;

        let attendance = sqlx::query_as::<_, AttendanceRow>(
            r#"SELECT student_id,
                      COALESCE(SUM(hadir), 0)::BIGINT AS hadir,
                      COALESCE(SUM(sakit), 0)::BIGINT AS sakit,
                      COALESCE(SUM(izin), 0)::BIGINT AS izin,
                      COALESCE(SUM(alpa), 0)::BIGINT AS alpa
               FROM behavior_records
               WHERE student_id = ANY($1) AND academic_year_id = ANY($2)
               GROUP BY student_id"#,
        )
        .bind(&student_ids)
        .bind(&year_ids)
        .fetch_all(db)
        .await?;

        let averages: HashMap<(StudentId, AcademicYearId), f64> = averages
            .into_iter()
            .map(|row| ((row.student_id, row.academic_year_id), round2(row.average)))
            .collect();
        let attendance: HashMap<StudentId, AttendanceSummary> = attendance
            .into_iter()
            .map(|row| {
                (
                    row.student_id,
                    AttendanceSummary::from_counts(row.hadir, row.sakit, row.izin, row.alpa),
                )
            })
            .collect();

        let students = roster
            .iter()
            .map(|student| {
                let average_in = |year: Option<AcademicYearId>| {
                    year.and_then(|id| averages.get(&(student.id, id)).copied())
                };
                build_candidate(
                    student,
                    average_in(ganjil_year),
                    average_in(genap_year),
                    attendance.get(&student.id).copied().unwrap_or_default(),
                    config,
                )
            })
            .collect();

        Ok(PromotionRoster {
            students,
            academic_year: academic_year.clone(),
            class_name: context.class.nama_kelas.clone(),
            program: context.class.program.clone(),
        })
    }

    /// Class-change history of a student the caller is (or was) homeroom of.
    #[instrument(skip(db))]
    pub async fn student_history(
        db: &PgPool,
        teacher_id: TeacherId,
        student_id: StudentId,
    ) -> Result<Vec<PromotionHistoryEntry>, AppError> {
        let context = Self::resolve_context(db, teacher_id).await?;

        let visible = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM students WHERE id = $1 AND current_class_id = $2)
                   OR EXISTS(SELECT 1 FROM promotion_history
                             WHERE student_id = $1 AND (from_class_id = $2 OR to_class_id = $2))"#,
        )
        .bind(student_id)
        .bind(context.class.id)
        .fetch_one(db)
        .await?;

        if !visible {
            return Err(AppError::not_found(anyhow!("Student not found in your class")));
        }

        let history = sqlx::query_as::<_, PromotionHistoryEntry>(
            r#"SELECT h.id, h.student_id,
                      h.from_class_id, fc.nama_kelas AS from_class_name,
                      h.to_class_id, tc.nama_kelas AS to_class_name,
                      h.from_academic_year_id,
                      concat(fy.tahun_mulai, '/', fy.tahun_selesai, ' ', fy.semester) AS from_academic_year,
                      h.to_academic_year_id,
                      concat(ty.tahun_mulai, '/', ty.tahun_selesai, ' ', ty.semester) AS to_academic_year,
                      h.naik_kelas, h.kind, h.performed_by, h.created_at
               FROM promotion_history h
               LEFT JOIN classes fc ON fc.id = h.from_class_id
               LEFT JOIN classes tc ON tc.id = h.to_class_id
               JOIN academic_years fy ON fy.id = h.from_academic_year_id
               JOIN academic_years ty ON ty.id = h.to_academic_year_id
               WHERE h.student_id = $1
               ORDER BY h.created_at, h.id"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(history)
    }
}

/// Serializes promotion and semester moves of one class until the transaction ends.
async fn lock_class(tx: &mut Transaction<'_, Postgres>, class_id: ClassId) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(class_id.to_string())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Repoints one student, guarded by the expected source class.
async fn move_student(
    tx: &mut Transaction<'_, Postgres>,
    planned: &PlannedMove,
    source_class_id: ClassId,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"UPDATE students
           SET current_class_id = $1, updated_at = NOW()
           WHERE id = $2 AND current_class_id = $3 AND status = 'ACTIVE'"#,
    )
    .bind(planned.to_class_id)
    .bind(planned.student_id)
    .bind(source_class_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_foreign_key_violation()
        {
            return AppError::conflict(anyhow!("Target class no longer exists"));
        }
        AppError::from(e)
    })?;

    if result.rows_affected() != 1 {
        warn!(student_id = %planned.student_id, "Student left the class before promotion");
        return Err(AppError::conflict(anyhow!(
            "Student {} is no longer in this class; no student was moved",
            planned.student_id
        )));
    }

    Ok(())
}

struct HistoryRow {
    student_id: StudentId,
    from_class_id: ClassId,
    to_class_id: ClassId,
    from_academic_year_id: AcademicYearId,
    to_academic_year_id: AcademicYearId,
    naik_kelas: bool,
    kind: HistoryKind,
    performed_by: TeacherId,
}

async fn record_history(
    tx: &mut Transaction<'_, Postgres>,
    row: HistoryRow,
) -> Result<(), AppError> {
    sqlx::query(
        r#"INSERT INTO promotion_history
               (student_id, from_class_id, to_class_id, from_academic_year_id,
                to_academic_year_id, naik_kelas, kind, performed_by)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
    )
    .bind(row.student_id)
    .bind(row.from_class_id)
    .bind(row.to_class_id)
    .bind(row.from_academic_year_id)
    .bind(row.to_academic_year_id)
    .bind(row.naik_kelas)
    .bind(row.kind.as_str())
    .bind(row.performed_by)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Finds the class with the same name in `target_year` or creates it, then copies the
/// subject list of `source` onto it.
///
/// An existing class is reused only when it has the same program and homeroom teacher.
async fn find_or_create_continuation(
    tx: &mut Transaction<'_, Postgres>,
    source: &ClassRecord,
    target_year: &AcademicYear,
) -> Result<ClassId, AppError> {
    let existing = sqlx::query_as::<_, (ClassId, ProgramId, Option<TeacherId>)>(
        r#"SELECT id, program_id, homeroom_teacher_id
           FROM classes
           WHERE academic_year_id = $1 AND nama_kelas = $2
           FOR UPDATE"#,
    )
    .bind(target_year.id)
    .bind(&source.nama_kelas)
    .fetch_optional(&mut **tx)
    .await?;

    let class_id = match existing {
        Some((id, program_id, homeroom_teacher_id))
            if program_id == source.program_id
                && homeroom_teacher_id == source.homeroom_teacher_id =>
        {
            id
        }
        Some((id, _, _)) => {
            warn!(
                class_id = %id,
                nama_kelas = %source.nama_kelas,
                "Same-named class in target semester belongs to another homeroom or program"
            );
            return Err(AppError::conflict(anyhow!(
                "Class {} already exists in {} with a different homeroom teacher or program",
                source.nama_kelas,
                target_year.label()
            )));
        }
        None => {
            let id = sqlx::query_scalar::<_, ClassId>(
                r#"INSERT INTO classes (nama_kelas, academic_year_id, program_id, homeroom_teacher_id)
                   VALUES ($1, $2, $3, $4)
                   RETURNING id"#,
            )
            .bind(&source.nama_kelas)
            .bind(target_year.id)
            .bind(source.program_id)
            .bind(source.homeroom_teacher_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow!(
                        "You are already homeroom teacher of another class in {}",
                        target_year.label()
                    ));
                }
                AppError::from(e)
            })?;
            info!(class_id = %id, nama_kelas = %source.nama_kelas, "Continuation class created");
            id
        }
    };

    sqlx::query(
        r#"INSERT INTO class_subjects (class_id, subject_id)
           SELECT $1, subject_id FROM class_subjects WHERE class_id = $2
           ON CONFLICT DO NOTHING"#,
    )
    .bind(class_id)
    .bind(source.id)
    .execute(&mut **tx)
    .await?;

    Ok(class_id)
}
