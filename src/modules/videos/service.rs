use edutrack_core::AppError;
use edutrack_models::Account;
use edutrack_models::videos::{
    CreateVideoDto, VideoFilterParams, VideoResponse, VideoRow, join_tags,
};
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::metrics;
use crate::modules::classes::service::ClassService;
use crate::utils::youtube::extract_youtube_id;

use super::visibility::{VideoScope, resolve_scope};

const VIDEO_COLUMNS: &str = "id, title, description, youtube_id, category, tags, difficulty, class_id, uploaded_by, created_at";

pub struct VideoService;

impl VideoService {
    #[instrument(skip(db, uploader, dto), fields(class.id = dto.class_id, db.operation = "INSERT", db.table = "videos"))]
    pub async fn upload_video(
        db: &PgPool,
        uploader: &Account,
        dto: CreateVideoDto,
    ) -> Result<VideoResponse, AppError> {
        let youtube_id = extract_youtube_id(&dto.youtube_url)?;

        if !ClassService::exists(db, dto.class_id).await? {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Class {} not found",
                dto.class_id
            )));
        }

        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "INSERT INTO videos (title, description, youtube_id, category, tags, difficulty, class_id, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            VIDEO_COLUMNS
        ))
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(&youtube_id)
        .bind(dto.category.trim())
        .bind(join_tags(&dto.tags))
        .bind(dto.difficulty.trim())
        .bind(dto.class_id)
        .bind(uploader.id())
        .fetch_one(db)
        .await?;

        metrics::track_video_uploaded(row.class_id);
        info!(video.id = %row.id, youtube.id = %row.youtube_id, "Video uploaded");

        Ok(row.into())
    }

    /// Videos visible to `viewer`, narrowed by the optional filters.
    #[instrument(skip(db, viewer, filters), fields(account.id = %viewer.id(), db.table = "videos"))]
    pub async fn list_videos(
        db: &PgPool,
        viewer: &Account,
        filters: VideoFilterParams,
    ) -> Result<Vec<VideoResponse>, AppError> {
        let scope = resolve_scope(db, viewer).await?;
        Self::fetch_in_scope(db, &scope, &filters).await
    }

    #[instrument(skip(db, viewer), fields(account.id = %viewer.id(), class.id = class_id))]
    pub async fn list_class_videos(
        db: &PgPool,
        viewer: &Account,
        class_id: i32,
    ) -> Result<Vec<VideoResponse>, AppError> {
        if !ClassService::exists(db, class_id).await? {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Class {} not found",
                class_id
            )));
        }

        let scope = resolve_scope(db, viewer).await?;
        if !scope.allows_class(class_id) {
            return Err(AppError::forbidden(format!(
                "You do not have access to videos of class {}",
                class_id
            )));
        }

        let filters = VideoFilterParams {
            class_id: Some(class_id),
            ..Default::default()
        };
        Self::fetch_in_scope(db, &scope, &filters).await
    }

    #[instrument(skip(db), fields(video.id = %id, db.operation = "DELETE", db.table = "videos"))]
    pub async fn delete_video(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Video not found")));
        }

        info!("Video deleted");
        Ok(())
    }

    async fn fetch_in_scope(
        db: &PgPool,
        scope: &VideoScope,
        filters: &VideoFilterParams,
    ) -> Result<Vec<VideoResponse>, AppError> {
        if scope.is_empty() {
            debug!("Empty video scope, skipping query");
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {} FROM videos
             WHERE ($1::int[] IS NULL OR class_id = ANY($1))
               AND ($2::int IS NULL OR class_id = $2)
               AND ($3::text IS NULL OR LOWER(category) = LOWER($3))
               AND ($4::text IS NULL OR LOWER(category) = LOWER($4))
               AND ($5::text IS NULL OR LOWER(difficulty) = LOWER($5))
             ORDER BY created_at DESC",
            VIDEO_COLUMNS
        ))
        .bind(scope.class_filter())
        .bind(filters.class_id)
        .bind(scope.category.as_deref())
        .bind(non_blank(filters.category.as_deref()))
        .bind(non_blank(filters.difficulty.as_deref()))
        .fetch_all(db)
        .await?;

        debug!(returned = rows.len(), "Videos fetched");
        Ok(rows.into_iter().map(VideoResponse::from).collect())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
