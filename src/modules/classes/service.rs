use edutrack_core::AppError;
use edutrack_models::classes::Class;
use sqlx::PgPool;
use tracing::instrument;

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classes"))]
    pub async fn list_classes(db: &PgPool) -> Result<Vec<Class>, AppError> {
        let classes = sqlx::query_as::<_, Class>("SELECT id, name FROM classes ORDER BY id")
            .fetch_all(db)
            .await?;
        Ok(classes)
    }

    /// Ids from `class_ids` with no matching class, sorted.
    #[instrument(skip(db), fields(db.table = "classes"))]
    pub async fn missing_classes(db: &PgPool, class_ids: &[i32]) -> Result<Vec<i32>, AppError> {
        let missing = sqlx::query_scalar::<_, i32>(
            "SELECT requested FROM UNNEST($1::int[]) AS requested
             WHERE NOT EXISTS (SELECT 1 FROM classes WHERE id = requested)
             ORDER BY requested",
        )
        .bind(class_ids)
        .fetch_all(db)
        .await?;
        Ok(missing)
    }

    pub async fn exists(db: &PgPool, class_id: i32) -> Result<bool, AppError> {
        Ok(Self::missing_classes(db, &[class_id]).await?.is_empty())
    }
}
