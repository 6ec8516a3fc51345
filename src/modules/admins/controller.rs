use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use edutrack_core::AppError;
use edutrack_models::admins::{
    Admin, AdminFilterParams, CreateAdminDto, PaginatedAdminsResponse, UpdateAdminDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AdminService;

#[utoipa::path(
    post,
    path = "/api/admins",
    request_body = CreateAdminDto,
    responses(
        (status = 201, description = "Admin created", body = Admin),
        (status = 400, description = "Email already exists"),
        (status = 403, description = "Forbidden - Superadmin only"),
        (status = 404, description = "College not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_admin(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAdminDto>,
) -> Result<(StatusCode, Json<Admin>), AppError> {
    let admin =
        AdminService::create_admin(&state.db, auth_user.role(), dto, &state.email_service())
            .await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

#[utoipa::path(
    get,
    path = "/api/admins",
    params(AdminFilterParams),
    responses(
        (status = 200, description = "Paginated list of admins", body = PaginatedAdminsResponse),
        (status = 403, description = "Forbidden - Superadmin only")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn list_admins(
    State(state): State<AppState>,
    filters: Result<Query<AdminFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedAdminsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(AdminService::list_admins(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/admins/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin details", body = Admin),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn get_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Admin>, AppError> {
    Ok(Json(AdminService::get_admin(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/admins/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    request_body = UpdateAdminDto,
    responses(
        (status = 200, description = "Admin updated", body = Admin),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn update_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAdminDto>,
) -> Result<Json<Admin>, AppError> {
    Ok(Json(AdminService::update_admin(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admins/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 204, description = "Admin deleted"),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AdminService::delete_admin(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
