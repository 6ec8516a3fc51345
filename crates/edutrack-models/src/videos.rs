//! Video models.
//!
//! Tags are stored comma-joined in a single column and exposed as a list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub youtube_id: String,
    pub category: String,
    pub tags: Option<String>,
    pub difficulty: String,
    pub class_id: i32,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub youtube_id: String,
    pub url: String,
    #[serde(rename = "embedUrl")]
    pub embed_url: String,
    pub category: String,
    pub tags: Vec<String>,
    pub difficulty: String,
    pub class_id: i32,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<VideoRow> for VideoResponse {
    fn from(row: VideoRow) -> Self {
        Self {
            url: format!("https://www.youtube.com/watch?v={}", row.youtube_id),
            embed_url: format!("https://www.youtube.com/embed/{}", row.youtube_id),
            tags: split_tags(row.tags.as_deref().unwrap_or_default()),
            id: row.id,
            title: row.title,
            description: row.description,
            youtube_id: row.youtube_id,
            category: row.category,
            difficulty: row.difficulty,
            class_id: row.class_id,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
        }
    }
}

pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_tags(tags: &[String]) -> Option<String> {
    let joined = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() { None } else { Some(joined) }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVideoDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    /// Full YouTube URL or a bare video ID
    #[serde(alias = "youtubeId", alias = "youtube_id")]
    #[validate(length(min = 1))]
    pub youtube_url: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(min = 1, max = 50))]
    pub difficulty: String,
    pub class_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct VideoFilterParams {
    pub class_id: Option<i32>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}
