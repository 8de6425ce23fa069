//! Homeroom data models.
//!
//! Request/response types live in the `edurapor-models` crate and are re-exported here;
//! the row types below only exist to shape queries of this module.

pub use edurapor_models::{
    AvailableClass, AvailableClassesQuery, ClassInfo, ClassRecord, InvalidStudent,
    MoveSemesterDto, MoveSemesterResponse, PromoteStudentsDto, PromoteStudentsResponse,
    PromotionCandidate, PromotionDecision, PromotionHistoryEntry, PromotionRoster,
    RosterStudent, ValidationReport,
};

use edurapor_models::{AcademicYear, AcademicYearId, StudentId, SubjectId};
use sqlx::FromRow;

/// The caller's class in the active academic year.
#[derive(Debug, Clone)]
pub struct HomeroomContext {
    pub class: ClassRecord,
    pub academic_year: AcademicYear,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ClassSubject {
    pub id: SubjectId,
    pub name: String,
}

/// Mean final score of one student in one academic year.
#[derive(Debug, Clone, FromRow)]
pub struct SemesterAverageRow {
    pub student_id: StudentId,
    pub academic_year_id: AcademicYearId,
    pub average: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRow {
    pub student_id: StudentId,
    pub hadir: i64,
    pub sakit: i64,
    pub izin: i64,
    pub alpa: i64,
}
