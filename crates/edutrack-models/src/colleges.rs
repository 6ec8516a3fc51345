//! College (tenant) models.

use chrono::{DateTime, Utc};
use edutrack_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::admins::Admin;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct College {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A college with the number of members attached to it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CollegeDetail {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub admin_count: i64,
    pub teacher_count: i64,
    pub student_count: i64,
}

/// Admin account created together with its college.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CollegeAdminDto {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    /// Generated and emailed when omitted
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCollegeDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(nested)]
    pub admin: Option<CollegeAdminDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateCollegeResponse {
    pub college: College,
    pub admin: Option<Admin>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCollegesResponse {
    pub data: Vec<College>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_admin_is_validated() {
        let dto = CreateCollegeDto {
            name: "North Ridge".to_string(),
            admin: Some(CollegeAdminDto {
                full_name: "Grace Hopper".to_string(),
                email: "not-an-email".to_string(),
                mobile: None,
                password: None,
            }),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_college_without_admin_is_valid() {
        let dto = CreateCollegeDto {
            name: "North Ridge".to_string(),
            admin: None,
        };
        assert!(dto.validate().is_ok());
    }
}
