use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use edurapor_core::AppError;
use edurapor_models::AcademicYearId;

use crate::middleware::auth::AuthUser;
use crate::modules::academic_years::model::{AcademicYear, CreateAcademicYearDto};
use crate::modules::academic_years::service::AcademicYearService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all academic years
#[utoipa::path(
    get,
    path = "/api/academic-years",
    summary = "List academic years",
    responses(
        (status = 200, description = "Academic years, newest first", body = Vec<AcademicYear>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_academic_years(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<AcademicYear>>, AppError> {
    let years = AcademicYearService::list(&state.db).await?;
    Ok(Json(years))
}

/// Create an academic year
#[utoipa::path(
    post,
    path = "/api/academic-years",
    summary = "Create academic year",
    request_body = CreateAcademicYearDto,
    responses(
        (status = 201, description = "Academic year created", body = AcademicYear),
        (status = 400, description = "Duplicate year/semester or invalid span"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_academic_year(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAcademicYearDto>,
) -> Result<(StatusCode, Json<AcademicYear>), AppError> {
    let year = AcademicYearService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(year)))
}

/// Get the active academic year
#[utoipa::path(
    get,
    path = "/api/academic-years/active",
    summary = "Get active academic year",
    responses(
        (status = 200, description = "Active academic year, or null when none is set", body = Option<AcademicYear>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_active_academic_year(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Option<AcademicYear>>, AppError> {
    let year = AcademicYearService::get_active(&state.db).await?;
    Ok(Json(year))
}

/// Make an academic year the active one
#[utoipa::path(
    post,
    path = "/api/academic-years/{id}/activate",
    summary = "Activate academic year",
    params(
        ("id" = Uuid, Path, description = "Academic year ID")
    ),
    responses(
        (status = 200, description = "Academic year activated", body = AcademicYear),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn activate_academic_year(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AcademicYear>, AppError> {
    let year = AcademicYearService::activate(&state.db, AcademicYearId::from(id)).await?;
    Ok(Json(year))
}
