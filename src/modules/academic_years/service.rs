use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use edurapor_core::AppError;
use edurapor_models::AcademicYearId;

use crate::modules::academic_years::model::{AcademicYear, CreateAcademicYearDto, Semester};

/// Columns of [`AcademicYear`]; `is_active` is derived from the settings pointer.
const ACADEMIC_YEAR_SELECT: &str = r#"SELECT ay.id, ay.tahun_mulai, ay.tahun_selesai, ay.semester,
       COALESCE(ay.id = s.active_academic_year_id, FALSE) AS is_active
  FROM academic_years ay
  LEFT JOIN app_settings s ON s.id"#;

pub struct AcademicYearService;

impl AcademicYearService {
    /// All academic years, newest first.
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<AcademicYear>, AppError> {
        let years = sqlx::query_as::<_, AcademicYear>(&format!(
            "{} ORDER BY ay.tahun_mulai DESC, ay.semester DESC",
            ACADEMIC_YEAR_SELECT
        ))
        .fetch_all(db)
        .await?;

        Ok(years)
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(
        db: &PgPool,
        id: AcademicYearId,
    ) -> Result<Option<AcademicYear>, AppError> {
        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "{} WHERE ay.id = $1",
            ACADEMIC_YEAR_SELECT
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(year)
    }

    pub async fn get_by_id(db: &PgPool, id: AcademicYearId) -> Result<AcademicYear, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Academic year not found")))
    }

    /// The year pointed to by the settings row, if any.
    #[instrument(skip(db))]
    pub async fn get_active(db: &PgPool) -> Result<Option<AcademicYear>, AppError> {
        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "{} WHERE ay.id = s.active_academic_year_id",
            ACADEMIC_YEAR_SELECT
        ))
        .fetch_optional(db)
        .await?;

        Ok(year)
    }

    /// The GANJIL half of the year span starting in `tahun_mulai`.
    #[instrument(skip(db))]
    pub async fn find_ganjil_of(
        db: &PgPool,
        tahun_mulai: i32,
    ) -> Result<Option<AcademicYear>, AppError> {
        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "{} WHERE ay.tahun_mulai = $1 AND ay.semester = $2",
            ACADEMIC_YEAR_SELECT
        ))
        .bind(tahun_mulai)
        .bind(Semester::Ganjil.as_str())
        .fetch_optional(db)
        .await?;

        Ok(year)
    }

    /// Years strictly after `source`, oldest first.
    #[instrument(skip(db))]
    pub async fn list_after(
        db: &PgPool,
        source: &AcademicYear,
    ) -> Result<Vec<AcademicYear>, AppError> {
        // GANJIL < GENAP also holds lexically, so the row comparison matches the domain order.
        let years = sqlx::query_as::<_, AcademicYear>(&format!(
            "{} WHERE (ay.tahun_mulai, ay.semester) > ($1, $2) ORDER BY ay.tahun_mulai, ay.semester",
            ACADEMIC_YEAR_SELECT
        ))
        .bind(source.tahun_mulai)
        .bind(source.semester.as_str())
        .fetch_all(db)
        .await?;

        Ok(years)
    }

    #[instrument(skip(db))]
    pub async fn create(db: &PgPool, dto: CreateAcademicYearDto) -> Result<AcademicYear, AppError> {
        let tahun_selesai = dto.resolved_tahun_selesai();
        if tahun_selesai != dto.tahun_mulai + 1 {
            return Err(AppError::bad_request(anyhow!(
                "tahunSelesai must be tahunMulai + 1"
            )));
        }

        let id = sqlx::query_scalar::<_, AcademicYearId>(
            r#"INSERT INTO academic_years (tahun_mulai, tahun_selesai, semester)
               VALUES ($1, $2, $3)
               RETURNING id"#,
        )
        .bind(dto.tahun_mulai)
        .bind(tahun_selesai)
        .bind(dto.semester.as_str())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow!(
                    "Academic year {}/{} {} already exists",
                    dto.tahun_mulai,
                    tahun_selesai,
                    dto.semester
                ));
            }
            AppError::from(e)
        })?;

        info!(academic_year_id = %id, "Academic year created");
        Self::get_by_id(db, id).await
    }

    /// Points the settings row at `id`. Exactly one year is active afterwards.
    #[instrument(skip(db))]
    pub async fn activate(db: &PgPool, id: AcademicYearId) -> Result<AcademicYear, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM academic_years WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Academic year not found")));
        }

        sqlx::query(
            r#"INSERT INTO app_settings (id, active_academic_year_id, updated_at)
               VALUES (TRUE, $1, NOW())
               ON CONFLICT (id) DO UPDATE
               SET active_academic_year_id = EXCLUDED.active_academic_year_id,
                   updated_at = NOW()"#,
        )
        .bind(id)
        .execute(db)
        .await?;

        info!(academic_year_id = %id, "Active academic year changed");
        Self::get_by_id(db, id).await
    }
}
