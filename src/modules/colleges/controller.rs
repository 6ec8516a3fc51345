use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use edutrack_core::{AppError, PaginationParams};
use edutrack_models::colleges::{
    CollegeDetail, CreateCollegeDto, CreateCollegeResponse, PaginatedCollegesResponse,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::CollegeService;

#[utoipa::path(
    post,
    path = "/api/colleges",
    request_body = CreateCollegeDto,
    responses(
        (status = 201, description = "College created, with its admin when one was given", body = CreateCollegeResponse),
        (status = 400, description = "College name or admin email already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Superadmin only")
    ),
    tag = "Colleges",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_college(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCollegeDto>,
) -> Result<(StatusCode, Json<CreateCollegeResponse>), AppError> {
    let created =
        CollegeService::create_college(&state.db, auth_user.role(), dto, &state.email_service())
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/colleges",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated list of colleges", body = PaginatedCollegesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Superadmin only")
    ),
    tag = "Colleges",
    security(("bearer_auth" = []))
)]
pub async fn list_colleges(
    State(state): State<AppState>,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<PaginatedCollegesResponse>, AppError> {
    let Query(pagination) = pagination
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(
        CollegeService::list_colleges(&state.db, pagination).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/colleges/{id}",
    params(("id" = Uuid, Path, description = "College ID")),
    responses(
        (status = 200, description = "College with member counts", body = CollegeDetail),
        (status = 404, description = "College not found")
    ),
    tag = "Colleges",
    security(("bearer_auth" = []))
)]
pub async fn get_college(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollegeDetail>, AppError> {
    Ok(Json(CollegeService::get_college(&state.db, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/colleges/{id}",
    params(("id" = Uuid, Path, description = "College ID")),
    responses(
        (status = 204, description = "College deleted"),
        (status = 404, description = "College not found"),
        (status = 409, description = "College still has members")
    ),
    tag = "Colleges",
    security(("bearer_auth" = []))
)]
pub async fn delete_college(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CollegeService::delete_college(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
