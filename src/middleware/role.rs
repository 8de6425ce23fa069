//! Role-based authorization middleware.
//!
//! Applied with `route_layer` so that unmatched paths still return 404 instead of 401.
//! On success the verified [`AuthUser`] is stored in the request extensions, so handler
//! extractors do not decode the token a second time.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use edurapor_auth::Role;
use edurapor_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Rejects the request unless the caller holds one of `allowed_roles`.
pub async fn require_roles(
    state: &AppState,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    parts.extensions.insert(auth_user);
    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Homeroom-teacher routes (`/api/homeroom/**`).
///
/// ```rust,ignore
/// init_homeroom_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_homeroom));
/// ```
pub async fn require_homeroom(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(&state, req, next, &[Role::Homeroom]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Administration routes (`/api/academic-years/**`).
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(&state, req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    if !allowed_roles.contains(&auth_user.role()) {
        let required = allowed_roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {}, but user has role: {}",
            required,
            auth_user.role()
        )));
    }

    Ok(())
}
