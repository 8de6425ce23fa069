//! Student models: status, roster rows, and promotion candidates.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

use crate::ParseEnumError;
use crate::academic_years::AcademicYear;
use crate::ids::StudentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
    Dropped,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "ACTIVE",
            StudentStatus::Inactive => "INACTIVE",
            StudentStatus::Graduated => "GRADUATED",
            StudentStatus::Dropped => "DROPPED",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for StudentStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "ACTIVE" => Ok(StudentStatus::Active),
            "INACTIVE" => Ok(StudentStatus::Inactive),
            "GRADUATED" => Ok(StudentStatus::Graduated),
            "DROPPED" => Ok(StudentStatus::Dropped),
            _ => Err(ParseEnumError::new("student status", value)),
        }
    }
}

/// A student on a class roster.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RosterStudent {
    pub id: StudentId,
    pub nama_lengkap: String,
    pub nisn: String,
    #[sqlx(try_from = "String")]
    pub status: StudentStatus,
}

/// Attendance totals across the evaluated semesters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummary {
    pub hadir: i64,
    pub sakit: i64,
    pub izin: i64,
    pub alpa: i64,
    /// Share of recorded days present, 0-100, two decimals
    pub persen: f64,
}

impl AttendanceSummary {
    pub fn from_counts(hadir: i64, sakit: i64, izin: i64, alpa: i64) -> Self {
        let total = hadir + sakit + izin + alpa;
        let persen = if total > 0 {
            round2(hadir as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            hadir,
            sakit,
            izin,
            alpa,
            persen,
        }
    }
}

/// A roster student annotated for the promotion form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionCandidate {
    pub id: StudentId,
    pub nama_lengkap: String,
    pub nisn: String,
    pub nilai_semester_ganjil: Option<f64>,
    pub nilai_semester_genap: Option<f64>,
    pub nilai_total: f64,
    pub attendance_summary: AttendanceSummary,
    /// Smart-toggle default; the operator may override it
    pub suggested_naik_kelas: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRoster {
    pub students: Vec<PromotionCandidate>,
    pub academic_year: AcademicYear,
    pub class_name: String,
    pub program: String,
}

/// Arithmetic mean rounded to two decimals; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(round2(values.iter().sum::<f64>() / values.len() as f64))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
