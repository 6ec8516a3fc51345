//! Teacher models.

use chrono::{DateTime, Utc};
use edutrack_core::PaginationMeta;
use edutrack_core::pagination::PaginationParams;
use edutrack_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const TEACHER_SELECT: &str = r#"
    SELECT
        t.id, t.account_id,
        TRIM(a.first_name || ' ' || COALESCE(a.last_name, '')) AS full_name,
        a.email, a.mobile, t.subject, t.college_id, t.created_by_admin_id,
        t.created_at, a.updated_at
    FROM teachers t
    JOIN accounts a ON a.id = t.account_id
"#;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub subject: Option<String>,
    pub college_id: Uuid,
    pub created_by_admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TeacherFilterParams {
    /// Superadmin only; admins are always scoped to their own college
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub college_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub data: Vec<Teacher>,
    pub meta: PaginationMeta,
}
