//! Route guards that admit a fixed set of roles.
//!
//! The role is read from the access token. Roles never change after an
//! account is created, so no database lookup is needed here.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use edutrack_core::AppError;
use edutrack_models::Role;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_superadmin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_roles(State(state), req, next, &[Role::Superadmin])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Superadmins and college admins.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(State(state), req, next, &[Role::Superadmin, Role::Admin])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Everyone except students.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(
        State(state),
        req,
        next,
        &[Role::Superadmin, Role::Admin, Role::Teacher],
    )
    .await
    .unwrap_or_else(IntoResponse::into_response)
}

/// Any valid access token.
pub async fn require_authenticated(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_roles(State(state), req, next, &Role::ALL)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

pub fn check_role(auth_user: &AuthUser, required: Role) -> Result<(), AppError> {
    check_any_role(auth_user, &[required])
}

pub fn check_any_role(auth_user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    let role = auth_user.role();
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. Required roles: {}, but account has role: {}",
            allowed
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            role
        )))
    }
}
