use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use edutrack_core::AppError;
use edutrack_models::Role;
use edutrack_models::classes::{
    AdminClassesResponse, GrantAccessDto, GrantAccessResponse, RevokeAllResponse,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::CurrentAccount;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ClassAccessService;

#[utoipa::path(
    post,
    path = "/api/class-access/grant",
    request_body = GrantAccessDto,
    responses(
        (status = 200, description = "Grants added; existing grants are kept", body = GrantAccessResponse),
        (status = 400, description = "Some classes do not exist"),
        (status = 403, description = "Forbidden - Superadmin only"),
        (status = 404, description = "Admin not found"),
        (status = 422, description = "No class ids given")
    ),
    tag = "Class Access",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn grant_access(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<GrantAccessDto>,
) -> Result<Json<GrantAccessResponse>, AppError> {
    Ok(Json(ClassAccessService::grant(&state.db, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/class-access/revoke/{admin_id}/class/{class_id}",
    params(
        ("admin_id" = Uuid, Path, description = "Admin ID"),
        ("class_id" = i32, Path, description = "Class ID")
    ),
    responses(
        (status = 204, description = "Grant removed"),
        (status = 404, description = "Access not found")
    ),
    tag = "Class Access",
    security(("bearer_auth" = []))
)]
pub async fn revoke_access(
    State(state): State<AppState>,
    Path((admin_id, class_id)): Path<(Uuid, i32)>,
) -> Result<StatusCode, AppError> {
    ClassAccessService::revoke(&state.db, admin_id, class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/class-access/revoke/{admin_id}/all",
    params(("admin_id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "All grants removed", body = RevokeAllResponse),
        (status = 404, description = "Admin not found")
    ),
    tag = "Class Access",
    security(("bearer_auth" = []))
)]
pub async fn revoke_all_access(
    State(state): State<AppState>,
    Path(admin_id): Path<Uuid>,
) -> Result<Json<RevokeAllResponse>, AppError> {
    Ok(Json(ClassAccessService::revoke_all(&state.db, admin_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/class-access/admin/{admin_id}/classes",
    params(("admin_id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Classes granted to the admin", body = AdminClassesResponse),
        (status = 403, description = "Only superadmins or the admin themselves"),
        (status = 404, description = "Admin not found")
    ),
    tag = "Class Access",
    security(("bearer_auth" = []))
)]
pub async fn admin_classes(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(admin_id): Path<Uuid>,
) -> Result<Json<AdminClassesResponse>, AppError> {
    let is_self = account.admin_id() == Some(admin_id);
    if account.role() != Role::Superadmin && !is_self {
        return Err(AppError::forbidden(
            "You can only view your own class access",
        ));
    }

    Ok(Json(
        ClassAccessService::list_for_admin(&state.db, admin_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/class-access/my-classes",
    responses(
        (status = 200, description = "Classes granted to the calling admin", body = AdminClassesResponse),
        (status = 403, description = "Caller is not a college admin")
    ),
    tag = "Class Access",
    security(("bearer_auth" = []))
)]
pub async fn my_classes(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<AdminClassesResponse>, AppError> {
    let admin_id = account
        .admin_id()
        .ok_or_else(|| AppError::forbidden("Only college admins have class access grants"))?;

    Ok(Json(
        ClassAccessService::list_for_admin(&state.db, admin_id).await?,
    ))
}
