//! Preconditions for moving a class from GANJIL to GENAP.

use anyhow::anyhow;
use serde_json::json;

use edurapor_core::AppError;
use edurapor_models::{AcademicYear, Semester};

/// Semester moves start from GANJIL only.
pub fn ensure_ganjil_source(source: &AcademicYear) -> Result<(), AppError> {
    if source.semester != Semester::Ganjil {
        return Err(AppError::forbidden(format!(
            "Semester move is only available during the GANJIL semester (current: {})",
            source.label()
        ))
        .with_details(json!({ "academicYear": source })));
    }
    Ok(())
}

/// Promotion runs at the end of the academic year, i.e. from GENAP only.
pub fn ensure_genap_source(source: &AcademicYear) -> Result<(), AppError> {
    if source.semester != Semester::Genap {
        return Err(AppError::forbidden(format!(
            "Promotion is only available during the GENAP semester (current: {})",
            source.label()
        ))
        .with_details(json!({
            "academicYear": source,
            "currentSemester": source.semester,
        })));
    }
    Ok(())
}

/// The target must be the GENAP half of the source's year span.
pub fn ensure_genap_continuation(
    source: &AcademicYear,
    target: &AcademicYear,
) -> Result<(), AppError> {
    if !source.is_genap_continuation(target) {
        return Err(AppError::bad_request(anyhow!(
            "Target academic year must be {}/{} GENAP",
            source.tahun_mulai,
            source.tahun_selesai
        )));
    }
    Ok(())
}

/// Promotion targets must lie strictly after the source year.
pub fn ensure_later_year(source: &AcademicYear, target: &AcademicYear) -> Result<(), AppError> {
    if !target.is_after(source) {
        return Err(AppError::bad_request(anyhow!(
            "Target academic year {} must be after {}",
            target.label(),
            source.label()
        )));
    }
    Ok(())
}
