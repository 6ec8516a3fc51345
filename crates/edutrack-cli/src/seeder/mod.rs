//! Fake data for local development.
//!
//! Seeded rows are recognisable: colleges carry [`SEED_COLLEGE_MARKER`],
//! staff emails use [`SEED_EMAIL_DOMAIN`] and student ids start with
//! [`SEED_STUDENT_PREFIX`]. [`clear_all`] only touches those rows.

mod accounts;
mod colleges;
mod models;

use std::time::Instant;

use edutrack_core::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

pub use accounts::{clear_accounts, generate_staff, generate_students, seed_staff, seed_students};
pub use colleges::{clear_colleges, generate_colleges, seed_colleges};
pub use models::{
    SEED_COLLEGE_MARKER, SEED_EMAIL_DOMAIN, SEED_STUDENT_PREFIX, SeedConfig, StaffPerCollege,
};

pub async fn seed_all(db: &PgPool, config: SeedConfig, password: &str) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} colleges with {} accounts each...\n",
        config.num_colleges,
        config.total_accounts_per_college()
    );

    edutrack_db::seed::seed_default_classes(db).await?;

    let password_hash = hash_password(password).map_err(|e| e.error)?;
    let college_ids = seed_colleges(db, config.num_colleges).await?;

    seed_staff(
        db,
        &college_ids,
        config.staff_per_college.admins,
        config.staff_per_college.teachers,
        &password_hash,
    )
    .await?;
    seed_students(db, &college_ids, config.students_per_college, &password_hash).await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    Ok(())
}

/// Ids of the seeded colleges already in the database.
pub async fn seeded_college_ids(db: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM colleges WHERE name LIKE '%' || $1 ORDER BY created_at",
    )
    .bind(SEED_COLLEGE_MARKER)
    .fetch_all(db)
    .await?;
    Ok(ids)
}

pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data (superadmins are kept)...\n");

    clear_accounts(db).await?;
    clear_colleges(db).await?;

    println!("\n✅ Cleared in {:?}", start_time.elapsed());
    Ok(())
}
