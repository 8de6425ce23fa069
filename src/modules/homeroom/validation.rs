//! Semester-completion rules.
//!
//! The service loads the roster, the class subjects and the recorded scores into a
//! [`ScoreSheet`]; everything here is pure so the rules can be tested without a database.

use std::collections::HashSet;

use edurapor_models::{
    AcademicYearId, IssueType, RosterStudent, Semester, StudentId, SubjectId, ValidationIssue,
    ValidationResult, ValidationSummary,
};

use super::model::ClassSubject;

/// A semester for which every student needs a behavior/attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorRequirement {
    pub academic_year_id: AcademicYearId,
    pub semester: Semester,
}

/// Which records exist for the evaluated academic year.
#[derive(Debug, Default)]
pub struct ScoreSheet {
    uts: HashSet<(StudentId, SubjectId)>,
    uas: HashSet<(StudentId, SubjectId)>,
    final_scores: HashSet<(StudentId, SubjectId)>,
    behavior: HashSet<(StudentId, AcademicYearId)>,
}

impl ScoreSheet {
    pub fn record_uts(&mut self, student_id: StudentId, subject_id: SubjectId) {
        self.uts.insert((student_id, subject_id));
    }

    pub fn record_uas(&mut self, student_id: StudentId, subject_id: SubjectId) {
        self.uas.insert((student_id, subject_id));
    }

    pub fn record_final_score(&mut self, student_id: StudentId, subject_id: SubjectId) {
        self.final_scores.insert((student_id, subject_id));
    }

    pub fn record_behavior(&mut self, student_id: StudentId, academic_year_id: AcademicYearId) {
        self.behavior.insert((student_id, academic_year_id));
    }

    fn has_uts(&self, student_id: StudentId, subject_id: SubjectId) -> bool {
        self.uts.contains(&(student_id, subject_id))
    }

    fn has_uas(&self, student_id: StudentId, subject_id: SubjectId) -> bool {
        self.uas.contains(&(student_id, subject_id))
    }

    fn has_final_score(&self, student_id: StudentId, subject_id: SubjectId) -> bool {
        self.final_scores.contains(&(student_id, subject_id))
    }

    fn has_behavior(&self, student_id: StudentId, academic_year_id: AcademicYearId) -> bool {
        self.behavior.contains(&(student_id, academic_year_id))
    }
}

/// Checks one student's records.
///
/// Issues are emitted in a fixed order (UTS, UAS, FINAL_SCORE, BEHAVIOR) and each issue
/// lists subjects in the order of `subjects`.
pub fn evaluate_student(
    student: &RosterStudent,
    subjects: &[ClassSubject],
    sheet: &ScoreSheet,
    behavior_requirements: &[BehaviorRequirement],
) -> ValidationResult {
    let mut missing_uts = Vec::new();
    let mut missing_uas = Vec::new();
    let mut missing_final = Vec::new();

    for subject in subjects {
        let has_uts = sheet.has_uts(student.id, subject.id);
        let has_uas = sheet.has_uas(student.id, subject.id);

        if !has_uts {
            missing_uts.push(subject.name.clone());
        }
        if !has_uas {
            missing_uas.push(subject.name.clone());
        }
        if has_uts && has_uas && !sheet.has_final_score(student.id, subject.id) {
            missing_final.push(subject.name.clone());
        }
    }

    let missing_behavior: Vec<String> = behavior_requirements
        .iter()
        .filter(|req| !sheet.has_behavior(student.id, req.academic_year_id))
        .map(|req| req.semester.to_string())
        .collect();

    let mut issues = Vec::new();

    if !missing_uts.is_empty() {
        issues.push(ValidationIssue {
            issue_type: IssueType::Uts,
            message: format!("Missing UTS score for {} subject(s)", missing_uts.len()),
            missing: missing_uts,
        });
    }

    if !missing_uas.is_empty() {
        issues.push(ValidationIssue {
            issue_type: IssueType::Uas,
            message: format!("Missing UAS score for {} subject(s)", missing_uas.len()),
            missing: missing_uas,
        });
    }

    if !missing_final.is_empty() {
        issues.push(ValidationIssue {
            issue_type: IssueType::FinalScore,
            message: format!(
                "Final score not computed for {} subject(s)",
                missing_final.len()
            ),
            missing: missing_final,
        });
    }

    if !missing_behavior.is_empty() {
        issues.push(ValidationIssue {
            issue_type: IssueType::Behavior,
            message: format!(
                "Missing behavior and attendance record for {}",
                missing_behavior.join(", ")
            ),
            missing: missing_behavior,
        });
    }

    ValidationResult {
        student_id: student.id,
        nama_lengkap: student.nama_lengkap.clone(),
        nisn: student.nisn.clone(),
        is_valid: issues.is_empty(),
        issues,
    }
}

/// Evaluates a whole roster, preserving roster order.
pub fn evaluate_roster(
    roster: &[RosterStudent],
    subjects: &[ClassSubject],
    sheet: &ScoreSheet,
    behavior_requirements: &[BehaviorRequirement],
) -> (Vec<ValidationResult>, ValidationSummary) {
    let results: Vec<ValidationResult> = roster
        .iter()
        .map(|student| evaluate_student(student, subjects, sheet, behavior_requirements))
        .collect();
    let summary = summarize(&results);
    (results, summary)
}

pub fn summarize(results: &[ValidationResult]) -> ValidationSummary {
    ValidationSummary::from_results(results)
}
