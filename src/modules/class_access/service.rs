//! Admin class-access grants.
//!
//! Granting is additive: classes already granted stay granted and are
//! reported back as `already_granted`. Revoking removes rows. Videos are
//! never touched here, visibility is computed when videos are queried.

use edutrack_core::AppError;
use edutrack_models::classes::{
    AccessibleClass, AdminClassesResponse, GrantAccessDto, GrantAccessResponse, RevokeAllResponse,
};
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::metrics;
use crate::modules::classes::service::ClassService;

pub struct ClassAccessService;

impl ClassAccessService {
    async fn ensure_admin_exists(db: &PgPool, admin_id: Uuid) -> Result<(), AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM admins WHERE id = $1)")
                .bind(admin_id)
                .fetch_one(db)
                .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::not_found(anyhow::anyhow!("Admin not found")))
        }
    }

    #[instrument(skip(db, dto), fields(admin.id = %dto.admin_id, db.table = "admin_class_access"))]
    pub async fn grant(db: &PgPool, dto: GrantAccessDto) -> Result<GrantAccessResponse, AppError> {
        let mut class_ids = dto.class_ids;
        class_ids.sort_unstable();
        class_ids.dedup();

        if class_ids.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "At least one class_id is required"
            )));
        }

        Self::ensure_admin_exists(db, dto.admin_id).await?;

        let missing = ClassService::missing_classes(db, &class_ids).await?;
        if !missing.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Classes not found: {}",
                missing
                    .iter()
                    .map(i32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let mut tx = db.begin().await?;

        let mut newly_granted = sqlx::query_scalar::<_, i32>(
            "INSERT INTO admin_class_access (admin_id, class_id)
             SELECT $1, class_id FROM UNNEST($2::int[]) AS class_id
             ON CONFLICT (admin_id, class_id) DO NOTHING
             RETURNING class_id",
        )
        .bind(dto.admin_id)
        .bind(&class_ids)
        .fetch_all(&mut *tx)
        .await?;
        newly_granted.sort_unstable();

        let current_access = sqlx::query_scalar::<_, i32>(
            "SELECT class_id FROM admin_class_access WHERE admin_id = $1 ORDER BY class_id",
        )
        .bind(dto.admin_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let already_granted = class_ids
            .into_iter()
            .filter(|id| !newly_granted.contains(id))
            .collect::<Vec<_>>();

        metrics::track_class_access_granted(newly_granted.len());
        info!(
            newly = newly_granted.len(),
            already = already_granted.len(),
            "Class access granted"
        );

        Ok(GrantAccessResponse {
            message: format!(
                "Granted access to {} new class(es), {} already granted",
                newly_granted.len(),
                already_granted.len()
            ),
            admin_id: dto.admin_id,
            newly_granted,
            already_granted,
            current_access,
        })
    }

    #[instrument(skip(db), fields(admin.id = %admin_id, class.id = class_id, db.operation = "DELETE"))]
    pub async fn revoke(db: &PgPool, admin_id: Uuid, class_id: i32) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM admin_class_access WHERE admin_id = $1 AND class_id = $2")
                .bind(admin_id)
                .bind(class_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            debug!("No grant to revoke");
            return Err(AppError::not_found(anyhow::anyhow!("Access not found")));
        }

        info!("Class access revoked");
        Ok(())
    }

    #[instrument(skip(db), fields(admin.id = %admin_id, db.operation = "DELETE"))]
    pub async fn revoke_all(db: &PgPool, admin_id: Uuid) -> Result<RevokeAllResponse, AppError> {
        Self::ensure_admin_exists(db, admin_id).await?;

        let revoked_count = sqlx::query("DELETE FROM admin_class_access WHERE admin_id = $1")
            .bind(admin_id)
            .execute(db)
            .await?
            .rows_affected();

        info!(revoked_count, "All class access revoked");

        Ok(RevokeAllResponse {
            message: format!("Revoked access to {} class(es)", revoked_count),
            admin_id,
            revoked_count,
        })
    }

    #[instrument(skip(db), fields(admin.id = %admin_id))]
    pub async fn list_for_admin(
        db: &PgPool,
        admin_id: Uuid,
    ) -> Result<AdminClassesResponse, AppError> {
        Self::ensure_admin_exists(db, admin_id).await?;

        let classes = sqlx::query_as::<_, AccessibleClass>(
            "SELECT c.id, c.name, aca.id AS access_id, aca.granted_at
             FROM admin_class_access aca
             JOIN classes c ON c.id = aca.class_id
             WHERE aca.admin_id = $1
             ORDER BY c.id",
        )
        .bind(admin_id)
        .fetch_all(db)
        .await?;

        Ok(AdminClassesResponse { admin_id, classes })
    }

    /// Class ids the admin may see videos for.
    pub async fn granted_class_ids(db: &PgPool, admin_id: Uuid) -> Result<Vec<i32>, AppError> {
        let ids = sqlx::query_scalar::<_, i32>(
            "SELECT class_id FROM admin_class_access WHERE admin_id = $1 ORDER BY class_id",
        )
        .bind(admin_id)
        .fetch_all(db)
        .await?;
        Ok(ids)
    }
}
