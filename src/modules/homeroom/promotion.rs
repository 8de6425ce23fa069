//! Promotion planning.
//!
//! [`plan_promotion`] turns the operator's decisions and a fresh validation report into
//! the list of class reassignments, or the reason the batch must be refused. The service
//! applies the plan inside a single transaction.

use std::collections::HashSet;

use anyhow::anyhow;
use serde_json::json;

use edurapor_config::PromotionConfig;
use edurapor_core::AppError;
use edurapor_models::{
    AttendanceSummary, ClassId, InvalidStudent, PromotionCandidate, PromotionDecision,
    RosterStudent, StudentId, ValidationReport, students::mean, suggest_promotion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionTargets {
    pub passed: ClassId,
    pub failed: Option<ClassId>,
}

/// One student's reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    pub student_id: StudentId,
    pub to_class_id: ClassId,
    pub naik_kelas: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromotionPlan {
    pub moves: Vec<PlannedMove>,
    /// Repeaters with no failed-target class; they keep their current class
    pub unchanged: Vec<StudentId>,
    pub acknowledged_issues: Vec<InvalidStudent>,
}

impl PromotionPlan {
    pub fn promoted_count(&self) -> usize {
        self.moves.iter().filter(|m| m.naik_kelas).count()
    }

    pub fn repeated_count(&self) -> usize {
        self.moves.iter().filter(|m| !m.naik_kelas).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    DuplicateStudents(Vec<StudentId>),
    UnknownStudents(Vec<StudentId>),
    IncompleteRecords(Vec<InvalidStudent>),
}

impl PlanError {
    pub fn into_app_error(self) -> AppError {
        match self {
            PlanError::DuplicateStudents(ids) => AppError::bad_request(anyhow!(
                "Each student may appear only once in promotions"
            ))
            .with_details(json!({ "duplicateStudentIds": ids })),
            PlanError::UnknownStudents(ids) => AppError::bad_request(anyhow!(
                "Some students are not active members of this class"
            ))
            .with_details(json!({ "unknownStudentIds": ids })),
            PlanError::IncompleteRecords(students) => AppError::bad_request(anyhow!(
                "Cannot promote students with incomplete semester records"
            ))
            .with_details(json!({ "invalidStudents": students })),
        }
    }
}

/// Decides every student's target class.
///
/// Students marked `naikKelas = true` must be valid in `report`; a single invalid one
/// refuses the whole batch and the error lists exactly those students. Repeaters may
/// carry issues; they are returned as `acknowledged_issues`.
pub fn plan_promotion(
    decisions: &[PromotionDecision],
    report: &ValidationReport,
    targets: PromotionTargets,
) -> Result<PromotionPlan, PlanError> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for decision in decisions {
        if !seen.insert(decision.student_id) && !duplicates.contains(&decision.student_id) {
            duplicates.push(decision.student_id);
        }
    }
    if !duplicates.is_empty() {
        return Err(PlanError::DuplicateStudents(duplicates));
    }

    let unknown: Vec<StudentId> = decisions
        .iter()
        .filter(|d| report.result_for(d.student_id).is_none())
        .map(|d| d.student_id)
        .collect();
    if !unknown.is_empty() {
        return Err(PlanError::UnknownStudents(unknown));
    }

    let mut moves = Vec::with_capacity(decisions.len());
    let mut unchanged = Vec::new();
    let mut blocked = Vec::new();
    let mut acknowledged_issues = Vec::new();

    for decision in decisions {
        let Some(result) = report.result_for(decision.student_id) else {
            continue;
        };

        if decision.naik_kelas {
            if !result.is_valid {
                blocked.push(InvalidStudent::from(result));
                continue;
            }
            moves.push(PlannedMove {
                student_id: decision.student_id,
                to_class_id: targets.passed,
                naik_kelas: true,
            });
            continue;
        }

        if !result.is_valid {
            acknowledged_issues.push(InvalidStudent::from(result));
        }

        match targets.failed {
            Some(failed) => moves.push(PlannedMove {
                student_id: decision.student_id,
                to_class_id: failed,
                naik_kelas: false,
            }),
            None => unchanged.push(decision.student_id),
        }
    }

    if !blocked.is_empty() {
        return Err(PlanError::IncompleteRecords(blocked));
    }

    Ok(PromotionPlan {
        moves,
        unchanged,
        acknowledged_issues,
    })
}

/// Annotates a roster student with averages, attendance and the smart-toggle default.
pub fn build_candidate(
    student: &RosterStudent,
    nilai_semester_ganjil: Option<f64>,
    nilai_semester_genap: Option<f64>,
    attendance_summary: AttendanceSummary,
    config: &PromotionConfig,
) -> PromotionCandidate {
    let available: Vec<f64> = [nilai_semester_ganjil, nilai_semester_genap]
        .into_iter()
        .flatten()
        .collect();
    let nilai_total = mean(&available).unwrap_or(0.0);

    PromotionCandidate {
        id: student.id,
        nama_lengkap: student.nama_lengkap.clone(),
        nisn: student.nisn.clone(),
        nilai_semester_ganjil,
        nilai_semester_genap,
        nilai_total,
        attendance_summary,
        suggested_naik_kelas: suggest_promotion(
            nilai_total,
            attendance_summary.persen,
            config,
        ),
    }
}
