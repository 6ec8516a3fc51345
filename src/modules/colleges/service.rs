use edutrack_core::{AppError, PaginationMeta, PaginationParams};
use edutrack_models::colleges::{
    College, CollegeDetail, CreateCollegeDto, CreateCollegeResponse, PaginatedCollegesResponse,
};
use edutrack_models::{Role, authorize_creation};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::metrics;
use crate::modules::accounts::service::generate_password;
use crate::modules::admins::service::{AdminService, NewAdmin};
use crate::utils::email::{EmailService, notify_new_account};

pub struct CollegeService;

impl CollegeService {
    /// Creates the college and its optional first admin. Either both rows
    /// exist afterwards or neither does.
    #[instrument(skip(db, dto, email_service), fields(college.name = %dto.name, db.operation = "INSERT", db.table = "colleges"))]
    pub async fn create_college(
        db: &PgPool,
        creator: Role,
        dto: CreateCollegeDto,
        email_service: &EmailService,
    ) -> Result<CreateCollegeResponse, AppError> {
        if dto.admin.is_some() {
            authorize_creation(creator, Role::Admin)?;
        }

        let mut tx = db.begin().await?;

        let college = sqlx::query_as::<_, College>(
            "INSERT INTO colleges (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(dto.name.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(college.name = %dto.name, "Attempted to create college with existing name");
                    return AppError::bad_request(anyhow::anyhow!("College name already exists"));
                }
            }
            error!(error = %e, "Database error creating college");
            AppError::from(e)
        })?;

        let mut created_admin = None;
        if let Some(admin_dto) = &dto.admin {
            let password = admin_dto.password.clone().unwrap_or_else(generate_password);
            let admin = AdminService::insert(
                &mut tx,
                NewAdmin {
                    college_id: college.id,
                    full_name: &admin_dto.full_name,
                    email: &admin_dto.email,
                    mobile: admin_dto.mobile.as_deref(),
                    password: &password,
                },
            )
            .await?;
            created_admin = Some((admin, password));
        }

        tx.commit().await?;

        info!(college.id = %college.id, "College created");

        let admin = match created_admin {
            Some((admin, password)) => {
                metrics::track_account_created(Role::Admin);
                notify_new_account(
                    email_service,
                    &admin.email,
                    &admin.full_name,
                    Role::Admin,
                    &college.name,
                    &password,
                )
                .await;
                Some(admin)
            }
            None => None,
        };

        Ok(CreateCollegeResponse { college, admin })
    }

    #[instrument(skip(db, pagination), fields(db.operation = "SELECT", db.table = "colleges"))]
    pub async fn list_colleges(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedCollegesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM colleges")
            .fetch_one(db)
            .await?;

        let colleges = sqlx::query_as::<_, College>(
            "SELECT id, name, created_at FROM colleges ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        debug!(total, returned = colleges.len(), "Colleges fetched");

        Ok(PaginatedCollegesResponse {
            data: colleges,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db), fields(college.id = %college_id, db.table = "colleges"))]
    pub async fn get_college(db: &PgPool, college_id: Uuid) -> Result<CollegeDetail, AppError> {
        sqlx::query_as::<_, CollegeDetail>(
            "SELECT c.id, c.name, c.created_at,
                (SELECT COUNT(*) FROM admins WHERE college_id = c.id) AS admin_count,
                (SELECT COUNT(*) FROM teachers WHERE college_id = c.id) AS teacher_count,
                (SELECT COUNT(*) FROM students WHERE college_id = c.id) AS student_count
             FROM colleges c
             WHERE c.id = $1",
        )
        .bind(college_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("College not found")))
    }

    /// Only empty colleges can be deleted.
    #[instrument(skip(db), fields(college.id = %college_id, db.operation = "DELETE", db.table = "colleges"))]
    pub async fn delete_college(db: &PgPool, college_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM colleges WHERE id = $1")
            .bind(college_id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::conflict(anyhow::anyhow!(
                            "College still has admins, teachers or students"
                        ));
                    }
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("College not found")));
        }

        info!("College deleted");
        Ok(())
    }
}
