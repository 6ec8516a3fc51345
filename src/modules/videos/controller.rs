use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use edutrack_core::AppError;
use edutrack_models::videos::{CreateVideoDto, VideoFilterParams, VideoResponse};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::CurrentAccount;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::VideoService;

#[utoipa::path(
    post,
    path = "/api/videos",
    request_body = CreateVideoDto,
    responses(
        (status = 201, description = "Video uploaded", body = VideoResponse),
        (status = 403, description = "Forbidden - Superadmin only"),
        (status = 404, description = "Class not found"),
        (status = 422, description = "Invalid YouTube URL or ID")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, account, dto))]
pub async fn upload_video(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ValidatedJson(dto): ValidatedJson<CreateVideoDto>,
) -> Result<(StatusCode, Json<VideoResponse>), AppError> {
    let video = VideoService::upload_video(&state.db, &account, dto).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    params(VideoFilterParams),
    responses(
        (status = 200, description = "Videos visible to the caller", body = Vec<VideoResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, account, filters))]
pub async fn list_videos(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    filters: Result<Query<VideoFilterParams>, QueryRejection>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    let Query(filters) = filters.map_err(|e| {
        AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e))
    })?;

    Ok(Json(
        VideoService::list_videos(&state.db, &account, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/videos/class/{class_id}",
    params(("class_id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Videos of the class", body = Vec<VideoResponse>),
        (status = 403, description = "Class is not visible to the caller"),
        (status = 404, description = "Class not found")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn list_class_videos(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(class_id): Path<i32>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    Ok(Json(
        VideoService::list_class_videos(&state.db, &account, class_id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 404, description = "Video not found")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    VideoService::delete_video(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
