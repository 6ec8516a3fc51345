//! Classes and admin class-access grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GrantAccessDto {
    pub admin_id: Uuid,
    #[validate(length(min = 1, message = "At least one class_id is required"))]
    pub class_ids: Vec<i32>,
}

/// Result of an additive grant. Existing grants are never removed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GrantAccessResponse {
    pub message: String,
    pub admin_id: Uuid,
    pub newly_granted: Vec<i32>,
    pub already_granted: Vec<i32>,
    pub current_access: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevokeAllResponse {
    pub message: String,
    pub admin_id: Uuid,
    pub revoked_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AccessibleClass {
    pub id: i32,
    pub name: String,
    pub access_id: Uuid,
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminClassesResponse {
    pub admin_id: Uuid,
    pub classes: Vec<AccessibleClass>,
}
