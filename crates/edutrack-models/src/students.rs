//! Student models, including the CSV import reports.

use chrono::{DateTime, Utc};
use edutrack_core::PaginationMeta;
use edutrack_core::pagination::PaginationParams;
use edutrack_core::serde::{deserialize_optional_i32, deserialize_optional_uuid};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Domain used for student logins, `{student_id}@college.edu`.
pub const STUDENT_EMAIL_DOMAIN: &str = "college.edu";

pub const STUDENT_SELECT: &str = r#"
    SELECT
        s.id, s.account_id, s.student_id, a.first_name, a.last_name, a.email,
        s.birth_year, a.mobile, s.college_id, s.class_id, s.created_by_teacher_id,
        s.created_at, a.updated_at
    FROM students s
    JOIN accounts a ON a.id = s.account_id
"#;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub account_id: Uuid,
    pub student_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub birth_year: i32,
    pub mobile: Option<String>,
    pub college_id: Uuid,
    pub class_id: Option<i32>,
    pub created_by_teacher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Login email derived from a student ID.
pub fn student_email(student_id: &str) -> String {
    format!("{}@{}", student_id.trim().to_lowercase(), STUDENT_EMAIL_DOMAIN)
}

/// Initial password: lower-cased first name followed by the birth year.
pub fn initial_student_password(first_name: &str, birth_year: i32) -> String {
    format!("{}{}", first_name.trim().to_lowercase(), birth_year)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 50))]
    pub student_id: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub birth_year: i32,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    pub class_id: Option<i32>,
    /// Defaults to `{student_id}@college.edu`
    #[validate(email)]
    pub email: Option<String>,
    /// Defaults to `{first_name}{birth_year}`
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub birth_year: Option<i32>,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    pub class_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    /// Superadmin only; staff are always scoped to their own college
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub college_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub class_id: Option<i32>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ImportUpdateParams {
    /// Update students whose email already exists instead of skipping them
    #[serde(default)]
    pub update_existing: bool,
}

/// Outcome of `POST /students/import`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentImportReport {
    pub message: String,
    pub successful_imports: usize,
    pub total_processed: usize,
    pub duplicates: Vec<String>,
    pub duplicate_count: usize,
    pub errors: Vec<String>,
    pub error_count: usize,
}

impl StudentImportReport {
    pub fn new(successful_imports: usize, prepared: usize, duplicates: Vec<String>, errors: Vec<String>) -> Self {
        Self {
            message: format!("{} students imported successfully", successful_imports),
            successful_imports,
            total_processed: prepared + duplicates.len() + errors.len(),
            duplicate_count: duplicates.len(),
            error_count: errors.len(),
            duplicates,
            errors,
        }
    }
}

/// Outcome of `POST /students/import-with-update`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentUpsertReport {
    pub message: String,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub error_count: usize,
}

impl StudentUpsertReport {
    pub fn new(created: usize, updated: usize, skipped: usize, errors: Vec<String>) -> Self {
        Self {
            message: format!(
                "Import completed: {} created, {} updated, {} skipped",
                created, updated, skipped
            ),
            created,
            updated,
            skipped,
            error_count: errors.len(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_credentials() {
        assert_eq!(student_email(" S-1001 "), "s-1001@college.edu");
        assert_eq!(initial_student_password("Maria", 2008), "maria2008");
    }

    #[test]
    fn test_import_report_totals() {
        let report = StudentImportReport::new(
            3,
            3,
            vec!["Row 5: Email 'x@college.edu' already exists in database".to_string()],
            vec!["Row 6: Invalid birth_year 'abc'".to_string()],
        );
        assert_eq!(report.message, "3 students imported successfully");
        assert_eq!(report.total_processed, 5);
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(report.error_count, 1);
    }

    #[test]
    fn test_create_student_dto_rejects_bad_birth_year() {
        let dto = CreateStudentDto {
            student_id: "S-1".to_string(),
            first_name: "Maria".to_string(),
            last_name: None,
            birth_year: 1066,
            mobile: None,
            class_id: None,
            email: None,
            password: None,
        };
        assert!(dto.validate().is_err());
    }
}
