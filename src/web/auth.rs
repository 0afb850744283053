// Role guard for the staff portal. The authentication provider is external;
// requests arrive carrying an opaque bearer token that maps to a role here.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{app_state::AppState, error::AppError, models::StaffRole};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get("authorization") {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token);
            }
        }
    }
    headers.get("x-portal-token").and_then(|v| v.to_str().ok())
}

/// Map the request's token to a portal role. Unknown or missing tokens are
/// an authentication failure, not a role.
fn role_for_request(state: &AppState, headers: &HeaderMap) -> Result<StaffRole, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("portal authentication required".to_string()))?;
    if state.config.portal.admin_token.as_deref() == Some(token) {
        return Ok(StaffRole::Superuser);
    }
    if state.config.portal.staff_token.as_deref() == Some(token) {
        return Ok(StaffRole::Staff);
    }
    Err(AppError::Unauthorized("portal authentication required".to_string()))
}

fn guard(state: &AppState, headers: &HeaderMap, required: StaffRole) -> Result<StaffRole, AppError> {
    let role = role_for_request(state, headers)?;
    if !role.allows(required) {
        return Err(AppError::Forbidden(format!(
            "{} access required",
            required.as_str()
        )));
    }
    Ok(role)
}

pub async fn require_staff(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let role = guard(&state, request.headers(), StaffRole::Staff)?;
    request.extensions_mut().insert(role);
    Ok(next.run(request).await)
}

pub async fn require_superuser(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let role = guard(&state, request.headers(), StaffRole::Superuser)?;
    request.extensions_mut().insert(role);
    Ok(next.run(request).await)
}
