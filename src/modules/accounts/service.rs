//! Account lookups shared by every module.
//!
//! An [`Account`] is always loaded in a single query that joins the role
//! profile tables, see [`edutrack_models::accounts::ACCOUNT_SELECT`].

use edutrack_core::{AppError, hash_password};
use edutrack_models::accounts::ACCOUNT_SELECT;
use edutrack_models::{Account, AccountRow, Role};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Fields of a new `accounts` row.
#[derive(Debug)]
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
    pub first_name: &'a str,
    pub last_name: Option<&'a str>,
    pub mobile: Option<&'a str>,
}

pub struct AccountService;

impl AccountService {
    #[instrument(skip(db), fields(account.id = %account_id, db.table = "accounts"))]
    pub async fn find(db: &PgPool, account_id: Uuid) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{} WHERE a.id = $1", ACCOUNT_SELECT))
            .bind(account_id)
            .fetch_optional(db)
            .await?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Row including the password hash, for credential checks.
    #[instrument(skip(db), fields(db.table = "accounts"))]
    pub async fn find_by_email_with_password(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<AccountRow>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "{} WHERE a.email = LOWER($1)",
            ACCOUNT_SELECT
        ))
        .bind(email.trim())
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Inserts an account row on an open transaction and returns its id.
    /// `password` is the plain text password.
    #[instrument(skip(conn, new), fields(account.role = %new.role, db.operation = "INSERT", db.table = "accounts"))]
    pub async fn insert(conn: &mut PgConnection, new: NewAccount<'_>) -> Result<Uuid, AppError> {
        let hashed = hash_password(new.password)?;
        Self::insert_hashed(conn, new, &hashed).await
    }

    /// Same as [`AccountService::insert`] with a precomputed bcrypt hash.
    pub async fn insert_hashed(
        conn: &mut PgConnection,
        new: NewAccount<'_>,
        password_hash: &str,
    ) -> Result<Uuid, AppError> {
        let email = new.email.trim().to_lowercase();

        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO accounts (email, password, role, first_name, last_name, mobile)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&email)
        .bind(password_hash)
        .bind(new.role)
        .bind(new.first_name.trim())
        .bind(new.last_name.map(str::trim))
        .bind(new.mobile)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(account.email = %email, "Email already registered");
                    return AppError::bad_request(anyhow::anyhow!(
                        "{} with this email already exists",
                        new.role.label()
                    ));
                }
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db, new_password), fields(account.id = %account_id, db.operation = "UPDATE", db.table = "accounts"))]
    pub async fn set_password(
        db: &PgPool,
        account_id: Uuid,
        new_password: &str,
    ) -> Result<(), AppError> {
        let hashed = hash_password(new_password)?;

        let result = sqlx::query(
            "UPDATE accounts SET password = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(&hashed)
        .bind(account_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Account not found")));
        }

        debug!("Password updated");
        Ok(())
    }
}

/// Random initial password for staff accounts created without one.
pub fn generate_password() -> String {
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}
