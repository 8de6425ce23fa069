//! Promotion and semester-move DTOs, history rows, and the smart-toggle policy.

use chrono::{DateTime, Utc};
use edurapor_config::PromotionConfig;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ParseEnumError;
use crate::ids::{AcademicYearId, ClassId, StudentId, TeacherId};
use crate::validation::InvalidStudent;

/// Operator's advance/repeat choice for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDecision {
    pub student_id: StudentId,
    pub naik_kelas: bool,
}

/// Body of `PATCH /api/homeroom/promote-students`.
///
/// Target ids are optional at the wire level so that a missing selection is reported as a
/// 400 with a readable message instead of a deserialization error. Empty strings count as
/// missing.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoteStudentsDto {
    #[validate(length(min = 1, message = "promotions must contain at least one student"))]
    pub promotions: Vec<PromotionDecision>,
    #[serde(default, deserialize_with = "edurapor_core::serde::deserialize_optional_uuid")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub target_academic_year_id: Option<AcademicYearId>,
    #[serde(default, deserialize_with = "edurapor_core::serde::deserialize_optional_uuid")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub target_class_id_for_passed: Option<ClassId>,
    #[serde(default, deserialize_with = "edurapor_core::serde::deserialize_optional_uuid")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub target_class_id_for_failed: Option<ClassId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoteStudentsResponse {
    pub message: String,
    /// Students moved to the passed target
    pub promoted_count: usize,
    /// Repeaters moved to the failed target
    pub repeated_count: usize,
    /// Repeaters left in the source class
    pub unchanged_count: usize,
    /// Repeaters whose incomplete records were tolerated
    pub acknowledged_issues: Vec<InvalidStudent>,
}

/// Body of `POST /api/homeroom/move-to-new-semester`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveSemesterDto {
    #[serde(default, deserialize_with = "edurapor_core::serde::deserialize_optional_uuid")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub target_academic_year_id: Option<AcademicYearId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveSemesterResponse {
    pub message: String,
    /// Continuation class in the GENAP year
    pub class_id: ClassId,
    pub moved_students: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryKind {
    Promotion,
    SemesterMove,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Promotion => "PROMOTION",
            HistoryKind::SemesterMove => "SEMESTER_MOVE",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for HistoryKind {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PROMOTION" => Ok(HistoryKind::Promotion),
            "SEMESTER_MOVE" => Ok(HistoryKind::SemesterMove),
            _ => Err(ParseEnumError::new("history kind", value)),
        }
    }
}

/// One class change of a student, joined with class names and year labels.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionHistoryEntry {
    pub id: Uuid,
    pub student_id: StudentId,
    pub from_class_id: Option<ClassId>,
    pub from_class_name: Option<String>,
    pub to_class_id: Option<ClassId>,
    pub to_class_name: Option<String>,
    pub from_academic_year_id: AcademicYearId,
    pub from_academic_year: String,
    pub to_academic_year_id: AcademicYearId,
    pub to_academic_year: String,
    pub naik_kelas: bool,
    #[sqlx(try_from = "String")]
    pub kind: HistoryKind,
    pub performed_by: Option<TeacherId>,
    pub created_at: DateTime<Utc>,
}

/// Advisory "naik kelas" default for the promotion form.
///
/// Both thresholds are inclusive. The executor never enforces this; the operator may
/// override any suggestion before submitting.
pub fn suggest_promotion(nilai_total: f64, attendance_percent: f64, config: &PromotionConfig) -> bool {
    nilai_total >= config.min_score && attendance_percent >= config.min_attendance_percent
}
