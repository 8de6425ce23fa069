//! Semester-completion report types.
//!
//! These are derived on every validator run and never persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::classes::ClassInfo;
use crate::ids::StudentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    /// Mid-semester exam score missing
    Uts,
    /// End-semester exam score missing
    Uas,
    /// Behavior / attendance record missing
    Behavior,
    /// UTS and UAS exist but no final score was computed
    FinalScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub message: String,
    /// Subject names (score issues) or semester names (behavior issues)
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub student_id: StudentId,
    pub nama_lengkap: String,
    pub nisn: String,
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_students: usize,
    pub valid_students: usize,
    pub invalid_students: usize,
    pub all_valid: bool,
}

impl ValidationSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let total_students = results.len();
        let valid_students = results.iter().filter(|r| r.is_valid).count();
        let invalid_students = total_students - valid_students;

        Self {
            total_students,
            valid_students,
            invalid_students,
            all_valid: invalid_students == 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub class_info: ClassInfo,
    pub validation: ValidationSummary,
    pub students: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn result_for(&self, student_id: StudentId) -> Option<&ValidationResult> {
        self.students.iter().find(|s| s.student_id == student_id)
    }

    pub fn invalid_students(&self) -> Vec<InvalidStudent> {
        self.students
            .iter()
            .filter(|s| !s.is_valid)
            .map(InvalidStudent::from)
            .collect()
    }
}

/// Student entry in `invalidStudents` / `acknowledgedIssues` payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvalidStudent {
    pub id: StudentId,
    pub nama_lengkap: String,
    pub issues: Vec<ValidationIssue>,
}

impl From<&ValidationResult> for InvalidStudent {
    fn from(result: &ValidationResult) -> Self {
        Self {
            id: result.student_id,
            nama_lengkap: result.nama_lengkap.clone(),
            issues: result.issues.clone(),
        }
    }
}
