use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::admins::{
    ADMIN_SELECT, Admin, AdminFilterParams, CreateAdminDto, PaginatedAdminsResponse,
    UpdateAdminDto,
};
use edutrack_models::{Role, authorize_creation, split_full_name};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::metrics;
use crate::modules::accounts::service::{AccountService, NewAccount, generate_password};
use crate::utils::email::{EmailService, notify_new_account};

/// Admin profile to create inside an open transaction.
#[derive(Debug)]
pub struct NewAdmin<'a> {
    pub college_id: Uuid,
    pub full_name: &'a str,
    pub email: &'a str,
    pub mobile: Option<&'a str>,
    pub password: &'a str,
}

pub struct AdminService;

impl AdminService {
    /// Inserts the account and admin rows. The caller owns the transaction.
    pub async fn insert(conn: &mut PgConnection, new: NewAdmin<'_>) -> Result<Admin, AppError> {
        let (first_name, last_name) = split_full_name(new.full_name);

        let account_id = AccountService::insert(
            &mut *conn,
            NewAccount {
                email: new.email,
                password: new.password,
                role: Role::Admin,
                first_name: &first_name,
                last_name: last_name.as_deref(),
                mobile: new.mobile,
            },
        )
        .await?;

        let admin_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO admins (account_id, college_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(account_id)
        .bind(new.college_id)
        .fetch_one(&mut *conn)
        .await?;

        let admin = sqlx::query_as::<_, Admin>(&format!("{} WHERE ad.id = $1", ADMIN_SELECT))
            .bind(admin_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(admin)
    }

    /// Creates an admin and, when addressed by name, its college, in one
    /// transaction.
    #[instrument(skip(db, dto, email_service), fields(admin.email = %dto.email, db.table = "admins"))]
    pub async fn create_admin(
        db: &PgPool,
        creator: Role,
        dto: CreateAdminDto,
        email_service: &EmailService,
    ) -> Result<Admin, AppError> {
        authorize_creation(creator, Role::Admin)?;

        let mut tx = db.begin().await?;

        let college_id = match (dto.college_id, dto.college_name.as_deref()) {
            (Some(college_id), _) => {
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM colleges WHERE id = $1)",
                )
                .bind(college_id)
                .fetch_one(&mut *tx)
                .await?;
                if !exists {
                    return Err(AppError::not_found(anyhow::anyhow!("College not found")));
                }
                college_id
            }
            (None, Some(name)) => find_or_create_college(&mut tx, name.trim()).await?,
            (None, None) => {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "Either college_id or college_name is required"
                )));
            }
        };

        let password = dto.password.clone().unwrap_or_else(generate_password);

        let admin = Self::insert(
            &mut tx,
            NewAdmin {
                college_id,
                full_name: &dto.full_name,
                email: &dto.email,
                mobile: dto.mobile.as_deref(),
                password: &password,
            },
        )
        .await?;

        tx.commit().await?;

        metrics::track_account_created(Role::Admin);
        info!(admin.id = %admin.id, college.id = %admin.college_id, "Admin created");

        notify_new_account(
            email_service,
            &admin.email,
            &admin.full_name,
            Role::Admin,
            &admin.college_name,
            &password,
        )
        .await;

        Ok(admin)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "admins"))]
    pub async fn list_admins(
        db: &PgPool,
        filters: AdminFilterParams,
    ) -> Result<PaginatedAdminsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admins WHERE ($1::uuid IS NULL OR college_id = $1)",
        )
        .bind(filters.college_id)
        .fetch_one(db)
        .await?;

        let admins = sqlx::query_as::<_, Admin>(&format!(
            "{} WHERE ($1::uuid IS NULL OR ad.college_id = $1)
             ORDER BY ad.created_at DESC LIMIT $2 OFFSET $3",
            ADMIN_SELECT
        ))
        .bind(filters.college_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching admins");
            AppError::from(e)
        })?;

        debug!(total, returned = admins.len(), "Admins fetched");

        Ok(PaginatedAdminsResponse {
            data: admins,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(admin.id = %admin_id, db.table = "admins"))]
    pub async fn get_admin(db: &PgPool, admin_id: Uuid) -> Result<Admin, AppError> {
        sqlx::query_as::<_, Admin>(&format!("{} WHERE ad.id = $1", ADMIN_SELECT))
            .bind(admin_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Admin not found")))
    }

    #[instrument(skip(db, dto), fields(admin.id = %admin_id, db.operation = "UPDATE", db.table = "accounts"))]
    pub async fn update_admin(
        db: &PgPool,
        admin_id: Uuid,
        dto: UpdateAdminDto,
    ) -> Result<Admin, AppError> {
        let current = Self::get_admin(db, admin_id).await?;

        let (first_name, last_name) =
            split_full_name(dto.full_name.as_deref().unwrap_or(&current.full_name));
        let email = dto
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .unwrap_or(current.email);
        let mobile = dto.mobile.or(current.mobile);

        sqlx::query(
            "UPDATE accounts
             SET first_name = $1, last_name = $2, email = $3, mobile = $4, updated_at = NOW()
             WHERE id = $5",
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&mobile)
        .bind(current.account_id)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(admin.email = %email, "Email already in use");
                    return AppError::bad_request(anyhow::anyhow!(
                        "Admin with this email already exists"
                    ));
                }
            }
            AppError::from(e)
        })?;

        Self::get_admin(db, admin_id).await
    }

    /// Removes the admin's account. Its grants go with it.
    #[instrument(skip(db), fields(admin.id = %admin_id, db.operation = "DELETE", db.table = "accounts"))]
    pub async fn delete_admin(db: &PgPool, admin_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM accounts WHERE id = (SELECT account_id FROM admins WHERE id = $1)",
        )
        .bind(admin_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Admin not found")));
        }

        info!("Admin deleted");
        Ok(())
    }
}

async fn find_or_create_college(conn: &mut PgConnection, name: &str) -> Result<Uuid, AppError> {
    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM colleges WHERE name = $1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = sqlx::query_scalar::<_, Uuid>("INSERT INTO colleges (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    info!(college.id = %id, college.name = %name, "College created for new admin");
    Ok(id)
}
