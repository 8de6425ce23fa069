//! Class models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::academic_years::AcademicYear;
use crate::ids::{AcademicYearId, ClassId, ProgramId, TeacherId};

/// Class row as the homeroom workflow needs it.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ClassRecord {
    pub id: ClassId,
    pub nama_kelas: String,
    pub academic_year_id: AcademicYearId,
    pub program_id: ProgramId,
    pub program: String,
    pub homeroom_teacher_id: Option<TeacherId>,
    pub homeroom_teacher: Option<String>,
}

/// Class context returned with a validation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub id: ClassId,
    pub nama_kelas: String,
    pub program: String,
    pub academic_year: AcademicYear,
    pub homeroom_teacher: Option<String>,
}

impl ClassInfo {
    pub fn new(class: &ClassRecord, academic_year: AcademicYear) -> Self {
        Self {
            id: class.id,
            nama_kelas: class.nama_kelas.clone(),
            program: class.program.clone(),
            academic_year,
            homeroom_teacher: class.homeroom_teacher.clone(),
        }
    }
}

/// Target class option for the promotion form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableClass {
    pub id: ClassId,
    pub nama_kelas: String,
    pub program: String,
    pub student_count: i64,
    pub homeroom_teacher: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailableClassesQuery {
    /// Academic year whose classes should be listed
    pub academic_year_id: AcademicYearId,
}
