use axum::{
    Json,
    extract::{Multipart, Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use edutrack_core::AppError;
use edutrack_models::students::{
    CreateStudentDto, ImportUpdateParams, PaginatedStudentsResponse, Student,
    StudentFilterParams, StudentImportReport, StudentUpsertReport, UpdateStudentDto,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::middleware::auth::CurrentAccount;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::StudentService;

/// Reads the `file` field of a multipart upload as UTF-8 CSV text.
async fn read_csv_upload(mut multipart: Multipart) -> Result<String, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let is_csv = field
            .file_name()
            .map(|name| name.to_lowercase().ends_with(".csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only CSV files are allowed"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read upload: {}", e)))?;
        debug!(size = bytes.len(), "CSV upload received");

        return String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::bad_request(anyhow::anyhow!("File must be UTF-8 encoded")));
    }

    Err(AppError::bad_request(anyhow::anyhow!("No file uploaded")))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Email or student ID already exists"),
        (status = 403, description = "Caller cannot create students"),
        (status = 422, description = "Validation error")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, account, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create_student(&state.db, &account, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Students visible to the caller", body = PaginatedStudentsResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn list_students(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    filters: Result<Query<StudentFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(
        StudentService::list_students(&state.db, &account, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student record ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn get_student(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(StudentService::get_student(&state.db, &account, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student record ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn update_student(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(
        StudentService::update_student(&state.db, &account, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student record ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn delete_student(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    StudentService::delete_student(&state.db, &account, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk import students from a CSV file
///
/// Required columns: `first_name`, `birth_year`, `student_id`. Optional:
/// `last_name`, `class_id`, `college_id`.
#[utoipa::path(
    post,
    path = "/api/students/import",
    request_body(content_type = "multipart/form-data", description = "CSV file in the `file` field"),
    responses(
        (status = 200, description = "Import report", body = StudentImportReport),
        (status = 400, description = "Not a CSV file or missing required columns"),
        (status = 403, description = "Caller cannot create students")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, account, multipart))]
pub async fn import_students(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    multipart: Multipart,
) -> Result<Json<StudentImportReport>, AppError> {
    let content = read_csv_upload(multipart).await?;
    let report = StudentService::import_students(&state.db, &account, &content).await?;
    Ok(Json(report))
}

/// Bulk import that can also update students that already exist
#[utoipa::path(
    post,
    path = "/api/students/import-with-update",
    params(ImportUpdateParams),
    request_body(content_type = "multipart/form-data", description = "CSV file in the `file` field"),
    responses(
        (status = 200, description = "Import report", body = StudentUpsertReport),
        (status = 400, description = "Not a CSV file or missing required columns"),
        (status = 403, description = "Caller cannot create students")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, account, params, multipart))]
pub async fn import_students_with_update(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    params: Result<Query<ImportUpdateParams>, QueryRejection>,
    multipart: Multipart,
) -> Result<Json<StudentUpsertReport>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let content = read_csv_upload(multipart).await?;
    let report = StudentService::import_with_update(
        &state.db,
        &account,
        &content,
        params.update_existing,
    )
    .await?;
    Ok(Json(report))
}
