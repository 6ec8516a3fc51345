//! Staff and student seeding.
//!
//! Every generated account shares one bcrypt hash: hashing thousands of
//! passwords would dominate the run time. Staff log in with the password
//! given to `seed`, students with it as well.

use std::collections::HashMap;
use std::time::Instant;

use edutrack_models::Role;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{
    AccountSeed, SEED_EMAIL_DOMAIN, SEED_STUDENT_PREFIX, StaffSeed, StudentSeed,
};

const SUBJECTS: [&str; 6] = ["Math", "Science", "English", "History", "Physics", "Art"];
const BATCH_SIZE: usize = 1000;

fn staff_account(role: Role, college_idx: usize, user_idx: usize) -> AccountSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let email = format!(
        "{}.{}+{}{}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        role.as_str(),
        college_idx * 1000 + user_idx,
        SEED_EMAIL_DOMAIN
    );

    AccountSeed {
        first_name,
        last_name,
        email,
        role,
    }
}

pub fn generate_staff(college_ids: &[Uuid], admins: usize, teachers: usize) -> Vec<StaffSeed> {
    college_ids
        .par_iter()
        .enumerate()
        .flat_map(|(college_idx, &college_id)| {
            let admins = (0..admins).map(move |i| StaffSeed {
                account: staff_account(Role::Admin, college_idx, i),
                college_id,
                subject: None,
            });
            let teachers = (0..teachers).map(move |i| StaffSeed {
                account: staff_account(Role::Teacher, college_idx, i),
                college_id,
                subject: Some(SUBJECTS[i % SUBJECTS.len()].to_string()),
            });
            admins.chain(teachers).collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_students(college_ids: &[Uuid], per_college: usize) -> Vec<StudentSeed> {
    college_ids
        .par_iter()
        .enumerate()
        .flat_map(|(college_idx, &college_id)| {
            let mut rng = rand::thread_rng();
            (0..per_college)
                .map(|i| {
                    let student_id = format!("{}{:03}-{:05}", SEED_STUDENT_PREFIX, college_idx, i);
                    StudentSeed {
                        account: AccountSeed {
                            first_name: FirstName().fake(),
                            last_name: LastName().fake(),
                            email: edutrack_models::students::student_email(&student_id),
                            role: Role::Student,
                        },
                        college_id,
                        student_id,
                        birth_year: rng.gen_range(2006..=2018),
                        // Roughly one in ten students has no class yet.
                        class_id: if rng.gen_ratio(1, 10) {
                            None
                        } else {
                            Some(rng.gen_range(1..=12))
                        },
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Inserts account rows and returns their ids keyed by email.
async fn insert_accounts(
    tx: &mut Transaction<'_, Postgres>,
    accounts: &[&AccountSeed],
    password_hash: &str,
) -> anyhow::Result<HashMap<String, Uuid>> {
    let emails = accounts.iter().map(|a| a.email.clone()).collect::<Vec<_>>();
    let first_names = accounts.iter().map(|a| a.first_name.clone()).collect::<Vec<_>>();
    let last_names = accounts.iter().map(|a| a.last_name.clone()).collect::<Vec<_>>();
    let roles = accounts.iter().map(|a| a.role.as_str()).collect::<Vec<_>>();

    let rows = sqlx::query_as::<_, (String, Uuid)>(
        "INSERT INTO accounts (email, password, role, first_name, last_name)
         SELECT e, $2, r::account_role, f, l
         FROM UNNEST($1::varchar[], $3::varchar[], $4::varchar[], $5::varchar[]) AS t(e, r, f, l)
         ON CONFLICT (email) DO NOTHING
         RETURNING email, id",
    )
    .bind(&emails)
    .bind(password_hash)
    .bind(&roles)
    .bind(&first_names)
    .bind(&last_names)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().collect())
}

pub async fn seed_staff(
    db: &PgPool,
    college_ids: &[Uuid],
    admins: usize,
    teachers: usize,
    password_hash: &str,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    println!(
        "👥 Seeding {} staff accounts ({} admins, {} teachers per college)...",
        college_ids.len() * (admins + teachers),
        admins,
        teachers
    );

    let staff = generate_staff(college_ids, admins, teachers);
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in staff.chunks(BATCH_SIZE) {
        let ids = insert_accounts(
            &mut tx,
            &chunk.iter().map(|s| &s.account).collect::<Vec<_>>(),
            password_hash,
        )
        .await?;

        let (mut admin_accounts, mut admin_colleges) = (Vec::new(), Vec::new());
        let (mut teacher_accounts, mut teacher_colleges, mut subjects) =
            (Vec::new(), Vec::new(), Vec::new());

        for seed in chunk {
            let Some(&account_id) = ids.get(&seed.account.email) else {
                continue;
            };
            match seed.account.role {
                Role::Admin => {
                    admin_accounts.push(account_id);
                    admin_colleges.push(seed.college_id);
                }
                _ => {
                    teacher_accounts.push(account_id);
                    teacher_colleges.push(seed.college_id);
                    subjects.push(seed.subject.clone());
                }
            }
        }

        sqlx::query(
            "INSERT INTO admins (account_id, college_id)
             SELECT * FROM UNNEST($1::uuid[], $2::uuid[])",
        )
        .bind(&admin_accounts)
        .bind(&admin_colleges)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO teachers (account_id, college_id, subject)
             SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::varchar[])",
        )
        .bind(&teacher_accounts)
        .bind(&teacher_colleges)
        .bind(&subjects)
        .execute(&mut *tx)
        .await?;

        inserted += ids.len();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} staff accounts in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

pub async fn seed_students(
    db: &PgPool,
    college_ids: &[Uuid],
    per_college: usize,
    password_hash: &str,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    println!(
        "🎓 Seeding {} students ({} per college)...",
        college_ids.len() * per_college,
        per_college
    );

    let students = generate_students(college_ids, per_college);
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in students.chunks(BATCH_SIZE) {
        let ids = insert_accounts(
            &mut tx,
            &chunk.iter().map(|s| &s.account).collect::<Vec<_>>(),
            password_hash,
        )
        .await?;

        let rows = chunk
            .iter()
            .filter_map(|s| ids.get(&s.account.email).map(|id| (*id, s)))
            .collect::<Vec<_>>();

        sqlx::query(
            "INSERT INTO students (account_id, student_id, birth_year, college_id, class_id)
             SELECT * FROM UNNEST($1::uuid[], $2::varchar[], $3::int[], $4::uuid[], $5::int[])",
        )
        .bind(rows.iter().map(|(id, _)| *id).collect::<Vec<_>>())
        .bind(rows.iter().map(|(_, s)| s.student_id.clone()).collect::<Vec<_>>())
        .bind(rows.iter().map(|(_, s)| s.birth_year).collect::<Vec<_>>())
        .bind(rows.iter().map(|(_, s)| s.college_id).collect::<Vec<_>>())
        .bind(rows.iter().map(|(_, s)| s.class_id).collect::<Vec<_>>())
        .execute(&mut *tx)
        .await?;

        inserted += rows.len();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

/// Deletes seeded accounts. Profile rows go with them.
pub async fn clear_accounts(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded accounts...");

    let deleted = sqlx::query(
        "DELETE FROM accounts
         WHERE role <> 'superadmin'
           AND (email LIKE '%@' || $1
                OR id IN (SELECT account_id FROM students WHERE student_id LIKE $2 || '%'))",
    )
    .bind(SEED_EMAIL_DOMAIN)
    .bind(SEED_STUDENT_PREFIX)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} accounts in {:?}",
        deleted,
        start_time.elapsed()
    );
    Ok(deleted)
}
