use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use edurapor_models::{
    AcademicYear, AttendanceSummary, AvailableClass, ClassInfo, CreateAcademicYearDto,
    HistoryKind, InvalidStudent, IssueType, MoveSemesterDto, MoveSemesterResponse,
    PromoteStudentsDto, PromoteStudentsResponse, PromotionCandidate, PromotionDecision,
    PromotionHistoryEntry, PromotionRoster, Semester, StudentStatus, ValidationIssue,
    ValidationReport, ValidationResult, ValidationSummary,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::homeroom::controller::validate_semester_completion,
        crate::modules::homeroom::controller::promote_students,
        crate::modules::homeroom::controller::move_to_new_semester,
        crate::modules::homeroom::controller::available_academic_years,
        crate::modules::homeroom::controller::available_academic_years_for_promotion,
        crate::modules::homeroom::controller::available_classes,
        crate::modules::homeroom::controller::my_students_for_promotion,
        crate::modules::homeroom::controller::student_history,
        crate::modules::academic_years::controller::list_academic_years,
        crate::modules::academic_years::controller::create_academic_year,
        crate::modules::academic_years::controller::get_active_academic_year,
        crate::modules::academic_years::controller::activate_academic_year,
    ),
    components(
        schemas(
            AcademicYear,
            Semester,
            CreateAcademicYearDto,
            ClassInfo,
            AvailableClass,
            StudentStatus,
            AttendanceSummary,
            PromotionCandidate,
            PromotionRoster,
            IssueType,
            ValidationIssue,
            ValidationResult,
            ValidationSummary,
            ValidationReport,
            InvalidStudent,
            PromotionDecision,
            PromoteStudentsDto,
            PromoteStudentsResponse,
            MoveSemesterDto,
            MoveSemesterResponse,
            HistoryKind,
            PromotionHistoryEntry,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Homeroom", description = "Semester completion, promotion and semester move for homeroom teachers"),
        (name = "Academic Years", description = "Academic year administration")
    ),
    info(
        title = "Edurapor API",
        version = "0.1.0",
        description = "Report card backend: semester completion checks, class promotion and semester moves.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
