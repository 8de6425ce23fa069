//! Academic year models and DTOs.
//!
//! An academic year row is one semester of one year span, e.g. 2025/2026 GENAP.
//! Rows are totally ordered by `(tahun_mulai, semester)`; GANJIL precedes GENAP.
//! Whether a row is active is derived from the `app_settings` singleton pointer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::ParseEnumError;
use crate::ids::AcademicYearId;

/// Odd (first) or even (second) semester of an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Semester {
    Ganjil,
    Genap,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::Ganjil => "GANJIL",
            Semester::Genap => "GENAP",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Semester {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "GANJIL" => Ok(Semester::Ganjil),
            "GENAP" => Ok(Semester::Genap),
            _ => Err(ParseEnumError::new("semester", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    pub id: AcademicYearId,
    pub tahun_mulai: i32,
    pub tahun_selesai: i32,
    #[sqlx(try_from = "String")]
    pub semester: Semester,
    pub is_active: bool,
}

impl AcademicYear {
    /// `"2025/2026 GENAP"`
    pub fn label(&self) -> String {
        format!("{}/{} {}", self.tahun_mulai, self.tahun_selesai, self.semester)
    }

    /// Chronological comparison, ignoring ids.
    pub fn chronological_cmp(&self, other: &AcademicYear) -> Ordering {
        (self.tahun_mulai, self.semester).cmp(&(other.tahun_mulai, other.semester))
    }

    pub fn is_after(&self, other: &AcademicYear) -> bool {
        self.chronological_cmp(other) == Ordering::Greater
    }

    /// True when `other` is the GENAP half of this GANJIL year span.
    pub fn is_genap_continuation(&self, other: &AcademicYear) -> bool {
        self.semester == Semester::Ganjil
            && other.semester == Semester::Genap
            && self.tahun_mulai == other.tahun_mulai
            && self.tahun_selesai == other.tahun_selesai
    }
}

/// DTO for creating an academic year. `tahunSelesai` defaults to `tahunMulai + 1`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAcademicYearDto {
    #[validate(range(min = 2000, max = 2100, message = "tahunMulai must be between 2000 and 2100"))]
    pub tahun_mulai: i32,
    pub tahun_selesai: Option<i32>,
    pub semester: Semester,
}

impl CreateAcademicYearDto {
    pub fn resolved_tahun_selesai(&self) -> i32 {
        self.tahun_selesai.unwrap_or(self.tahun_mulai + 1)
    }
}
