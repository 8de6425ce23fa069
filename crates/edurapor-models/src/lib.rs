//! # edurapor Models
//!
//! Domain models and DTOs shared by the API server and the CLI.
//!
//! # Modules
//!
//! - [`ids`]: Typed UUID newtypes
//! - [`academic_years`]: Academic years, semesters
//! - [`classes`]: Class summaries
//! - [`students`]: Student status, promotion candidates, attendance summaries
//! - [`validation`]: Semester-completion report types
//! - [`promotion`]: Promotion and semester-move DTOs, the smart-toggle policy

pub mod academic_years;
pub mod classes;
pub mod ids;
pub mod promotion;
pub mod students;
pub mod validation;

pub use academic_years::{AcademicYear, CreateAcademicYearDto, Semester};
pub use classes::{AvailableClass, AvailableClassesQuery, ClassInfo, ClassRecord};
pub use ids::{AcademicYearId, ClassId, ProgramId, StudentId, SubjectId, TeacherId};
pub use promotion::{
    HistoryKind, MoveSemesterDto, MoveSemesterResponse, PromoteStudentsDto,
    PromoteStudentsResponse, PromotionDecision, PromotionHistoryEntry, suggest_promotion,
};
pub use students::{
    AttendanceSummary, PromotionCandidate, PromotionRoster, RosterStudent, StudentStatus,
};
pub use validation::{
    InvalidStudent, IssueType, ValidationIssue, ValidationReport, ValidationResult,
    ValidationSummary,
};

/// A stored enum column held a value outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} value: {value}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}
