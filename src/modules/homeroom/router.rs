use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    available_academic_years, available_academic_years_for_promotion, available_classes,
    move_to_new_semester, my_students_for_promotion, promote_students, student_history,
    validate_semester_completion,
};

pub fn init_homeroom_router() -> Router<AppState> {
    Router::new()
        .route(
            "/validate-semester-completion",
            get(validate_semester_completion),
        )
        .route("/promote-students", patch(promote_students))
        .route("/move-to-new-semester", post(move_to_new_semester))
        .route("/available-academic-years", get(available_academic_years))
        .route(
            "/available-academic-years-for-promotion",
            get(available_academic_years_for_promotion),
        )
        .route("/available-classes", get(available_classes))
        .route("/my-students-for-promotion", get(my_students_for_promotion))
        .route("/students/{id}/history", get(student_history))
}
