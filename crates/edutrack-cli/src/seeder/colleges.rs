//! College seeding.

use std::time::Instant;

use fake::Fake;
use fake::faker::address::en::CityName;
use rayon::prelude::*;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{CollegeSeed, SEED_COLLEGE_MARKER};

/// Generates college names in parallel. The index keeps names unique even
/// when the faker repeats a city.
pub fn generate_colleges(count: usize) -> Vec<CollegeSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let city: String = CityName().fake();
            CollegeSeed {
                name: format!("{} College {} {}", city, idx + 1, SEED_COLLEGE_MARKER),
            }
        })
        .collect()
}

pub async fn seed_colleges(db: &PgPool, count: usize) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} colleges...", count);

    let colleges = generate_colleges(count);
    let names = colleges.into_iter().map(|c| c.name).collect::<Vec<_>>();

    let ids = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO colleges (name)
         SELECT UNNEST($1::varchar[])
         ON CONFLICT (name) DO NOTHING
         RETURNING id",
    )
    .bind(&names)
    .fetch_all(db)
    .await?;

    println!(
        "   ✓ Inserted {} colleges in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Deletes seeded colleges that no longer have members.
pub async fn clear_colleges(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded colleges...");

    let deleted = sqlx::query(
        "DELETE FROM colleges c
         WHERE c.name LIKE '%' || $1
           AND NOT EXISTS (SELECT 1 FROM admins WHERE college_id = c.id)
           AND NOT EXISTS (SELECT 1 FROM teachers WHERE college_id = c.id)
           AND NOT EXISTS (SELECT 1 FROM students WHERE college_id = c.id)",
    )
    .bind(SEED_COLLEGE_MARKER)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} colleges in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}
