use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    activate_academic_year, create_academic_year, get_active_academic_year, list_academic_years,
};

/// Routes: GET /, POST /, GET /active, POST /{id}/activate
pub fn init_academic_years_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_academic_years).post(create_academic_year))
        .route("/active", get(get_active_academic_year))
        .route("/{id}/activate", post(activate_academic_year))
}
