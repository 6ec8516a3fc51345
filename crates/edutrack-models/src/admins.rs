//! College admin models.

use chrono::{DateTime, Utc};
use edutrack_core::PaginationMeta;
use edutrack_core::pagination::PaginationParams;
use edutrack_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Columns shared by every admin query, in [`Admin`] order.
pub const ADMIN_SELECT: &str = r#"
    SELECT
        ad.id, ad.account_id,
        TRIM(a.first_name || ' ' || COALESCE(a.last_name, '')) AS full_name,
        a.email, a.mobile, ad.college_id, c.name AS college_name, ad.created_at
    FROM admins ad
    JOIN accounts a ON a.id = ad.account_id
    JOIN colleges c ON c.id = ad.college_id
"#;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admin {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub college_id: Uuid,
    pub college_name: String,
    pub created_at: DateTime<Utc>,
}

/// Either `college_id` or `college_name` must be given. A college named
/// here that does not exist yet is created in the same transaction.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdminDto {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub college_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub college_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAdminDto {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AdminFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub college_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAdminsResponse {
    pub data: Vec<Admin>,
    pub meta: PaginationMeta,
}
