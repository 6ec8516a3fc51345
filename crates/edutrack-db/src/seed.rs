//! Startup seeding: the fixed class set and the bootstrap superadmin.

use edutrack_core::hash_password;
use edutrack_models::Role;
use sqlx::PgPool;
use uuid::Uuid;

/// Names of the default classes, "1" through "12".
pub fn default_class_names() -> Vec<String> {
    (1..=12).map(|n| n.to_string()).collect()
}

/// Inserts the default classes when the table is empty. Returns how many
/// rows were inserted.
#[tracing::instrument(skip(pool))]
pub async fn seed_default_classes(pool: &PgPool) -> anyhow::Result<u64> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        tracing::debug!(existing, "Classes already present, skipping seed");
        return Ok(0);
    }

    let inserted = sqlx::query(
        "INSERT INTO classes (name) SELECT UNNEST($1::varchar[]) ON CONFLICT (name) DO NOTHING",
    )
    .bind(default_class_names())
    .execute(pool)
    .await?
    .rows_affected();

    tracing::info!(inserted, "Seeded default classes");
    Ok(inserted)
}

/// Creates a superadmin account. Fails if the email is taken.
pub async fn create_superadmin(
    pool: &PgPool,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: Option<&str>,
) -> anyhow::Result<Uuid> {
    let hashed = hash_password(password).map_err(|e| e.error)?;

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO accounts (email, password, role, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(email.trim().to_lowercase())
    .bind(hashed)
    .bind(Role::Superadmin)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return anyhow::anyhow!("An account with email {} already exists", email);
            }
        }
        anyhow::Error::from(e)
    })?;

    Ok(id)
}

/// Makes sure the bootstrap superadmin exists. An existing account with
/// the same email is left untouched, password included.
#[tracing::instrument(skip(pool, password))]
pub async fn ensure_superadmin(
    pool: &PgPool,
    email: &str,
    password: &str,
    name: &str,
) -> anyhow::Result<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
            .bind(email.trim().to_lowercase())
            .fetch_one(pool)
            .await?;

    if exists {
        tracing::debug!("Bootstrap superadmin already exists");
        return Ok(false);
    }

    let (first_name, last_name) = edutrack_models::split_full_name(name);
    let id = create_superadmin(pool, email, password, &first_name, last_name.as_deref()).await?;
    tracing::info!(account.id = %id, "Created bootstrap superadmin");
    Ok(true)
}
