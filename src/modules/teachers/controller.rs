use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use edutrack_core::AppError;
use edutrack_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, TeacherFilterParams, UpdateTeacherDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::CurrentAccount;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::TeacherService;

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = Teacher),
        (status = 400, description = "Email already exists"),
        (status = 403, description = "Only college admins can create teachers"),
        (status = 422, description = "Validation error")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, account, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher =
        TeacherService::create_teacher(&state.db, &account, dto, &state.email_service()).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(TeacherFilterParams),
    responses(
        (status = 200, description = "Teachers visible to the caller", body = PaginatedTeachersResponse),
        (status = 403, description = "Forbidden")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    filters: Result<Query<TeacherFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedTeachersResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(
        TeacherService::list_teachers(&state.db, &account, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = Teacher),
        (status = 404, description = "Teacher not found")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
pub async fn get_teacher(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(TeacherService::get_teacher(&state.db, &account, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 404, description = "Teacher not found")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(
        TeacherService::update_teacher(&state.db, &account, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TeacherService::delete_teacher(&state.db, &account, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
