use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use edurapor_core::AppError;
use edurapor_models::{AcademicYear, StudentId};

use crate::middleware::auth::AuthUser;
use crate::modules::homeroom::model::{
    AvailableClass, AvailableClassesQuery, MoveSemesterDto, MoveSemesterResponse,
    PromoteStudentsDto, PromoteStudentsResponse, PromotionHistoryEntry, PromotionRoster,
    ValidationReport,
};
use crate::modules::homeroom::service::HomeroomService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Check score and attendance completeness for the homeroom class
#[utoipa::path(
    get,
    path = "/api/homeroom/validate-semester-completion",
    summary = "Validate semester completion",
    responses(
        (status = 200, description = "Per-student completeness report", body = ValidationReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires homeroom role"),
        (status = 404, description = "Caller has no class in the active academic year")
    ),
    tag = "Homeroom",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn validate_semester_completion(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ValidationReport>, AppError> {
    let teacher_id = auth_user.teacher_id()?;
    let report = HomeroomService::validate_semester_completion(&state.db, teacher_id).await?;
    Ok(Json(report))
}

/// Promote or hold back the students of the homeroom class
#[utoipa::path(
    patch,
    path = "/api/homeroom/promote-students",
    summary = "Promote students",
    request_body = PromoteStudentsDto,
    responses(
        (status = 200, description = "Students reassigned", body = PromoteStudentsResponse),
        (status = 400, description = "Target not selected, unknown students, or incomplete records (invalidStudents)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires homeroom role, or the active semester is not GENAP"),
        (status = 404, description = "Class or target not found"),
        (status = 409, description = "Roster changed concurrently; nothing was moved"),
        (status = 422, description = "No promotion decisions submitted")
    ),
    tag = "Homeroom",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn promote_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<PromoteStudentsDto>,
) -> Result<Json<PromoteStudentsResponse>, AppError> {
    let teacher_id = auth_user.teacher_id()?;
    let response = HomeroomService::promote_students(&state.db, teacher_id, dto).await?;
    Ok(Json(response))
}

/// Move the homeroom class from GANJIL into the GENAP semester
#[utoipa::path(
    post,
    path = "/api/homeroom/move-to-new-semester",
    summary = "Move class to new semester",
    request_body = MoveSemesterDto,
    responses(
        (status = 200, description = "Class moved", body = MoveSemesterResponse),
        (status = 400, description = "Wrong target year or incomplete records (invalidStudents)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires homeroom role, or the active semester is not GANJIL"),
        (status = 404, description = "Class or target year not found"),
        (status = 409, description = "Roster changed concurrently; nothing was moved")
    ),
    tag = "Homeroom",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn move_to_new_semester(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<MoveSemesterDto>,
) -> Result<Json<MoveSemesterResponse>, AppError> {
    let teacher_id = auth_user.teacher_id()?;
    let response = HomeroomService::move_to_new_semester(&state.db, teacher_id, dto).await?;
    Ok(Json(response))
}

/// List all academic years
#[utoipa::path(
    get,
    path = "/api/homeroom/available-academic-years",
    summary = "List academic years",
    responses(
        (status = 200, description = "Academic years, newest first", body = Vec<AcademicYear>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires homeroom role")
    ),
    tag = "Homeroom",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn available_academic_years(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<AcademicYear>>, AppError> {
    let years = HomeroomService::available_academic_years(&state.db).await?;
    Ok(Json(years))
}

/// List academic years the homeroom class can be promoted into
#[utoipa::path(
    get,
    path = "/api/homeroom/available-academic-years-for-promotion",
    summary = "List promotion target years",
    responses(
        (status = 200, description = "Academic years after the class's year, oldest first", body = Vec<AcademicYear>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires homeroom role"),
        (status = 404, description = "Caller has no class in the active academic year")
    ),
    tag = "Homeroom",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn available_academic_years_for_promotion(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<AcademicYear>>, AppError> {
    let teacher_id = auth_user.teacher_id()?;
    let years =
        HomeroomService::available_academic_years_for_promotion(&state.db, teacher_id).await?;
    Ok(Json(years))
}

/// List classes of an academic year
#[utoipa::path(
    get,
    path = "/api/homeroom/available-classes",
    summary = "List target classes",
    params(AvailableClassesQuery),
    responses(
        (status = 200, description = "Classes ordered by name", body = Vec<AvailableClass>),
        (status = 400, description = "Missing or malformed academicYearId"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires homeroom role"),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Homeroom",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn available_classes(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<AvailableClassesQuery>,
) -> Result<Json<Vec<AvailableClass>>, AppError> {
    let classes = HomeroomService::available_classes(&state.db, query.academic_year_id).await?;
    Ok(Json(classes))
}

/// Roster with averages, attendance and suggested promotion decisions
#[utoipa::path(
    get,
    path = "/api/homeroom/my-students-for-promotion",
    summary = "List students for promotion",
    responses(
        (status = 200, description = "Promotion form data", body = PromotionRoster),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires homeroom role"),
        (status = 404, description = "Caller has no class in the active academic year")
    ),
    tag = "Homeroom",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn my_students_for_promotion(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<PromotionRoster>, AppError> {
    let teacher_id = auth_user.teacher_id()?;
    let roster =
        HomeroomService::students_for_promotion(&state.db, teacher_id, &state.promotion_config)
            .await?;
    Ok(Json(roster))
}

/// Class-change history of a student
#[utoipa::path(
    get,
    path = "/api/homeroom/students/{id}/history",
    summary = "Get student promotion history",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "History entries, oldest first", body = Vec<PromotionHistoryEntry>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires homeroom role"),
        (status = 404, description = "Student not in the caller's class")
    ),
    tag = "Homeroom",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn student_history(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PromotionHistoryEntry>>, AppError> {
    let teacher_id = auth_user.teacher_id()?;
    let history =
        HomeroomService::student_history(&state.db, teacher_id, StudentId::from(id)).await?;
    Ok(Json(history))
}
