use std::collections::{HashMap, HashSet};

use edutrack_core::{AppError, PaginationMeta, hash_password};
use edutrack_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, STUDENT_SELECT, Student, StudentFilterParams,
    StudentImportReport, StudentUpsertReport, UpdateStudentDto, initial_student_password,
    student_email,
};
use edutrack_models::{Account, Role, authorize_creation};
use rayon::prelude::*;
use sqlx::{Connection, PgConnection, PgPool};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::metrics;
use crate::modules::accounts::service::{AccountService, NewAccount};
use crate::modules::classes::service::ClassService;
use crate::utils::auth_helpers::{college_scope_for_listing, require_college, verify_college_access};

use super::import::{
    ExistingStudent, ImportContext, PreparedStudent, UpsertContext, candidate_keys,
    parse_students_csv, plan_import, plan_upsert,
};

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, creator, dto), fields(student.student_id = %dto.student_id, db.table = "students"))]
    pub async fn create_student(
        db: &PgPool,
        creator: &Account,
        dto: CreateStudentDto,
    ) -> Result<Student, AppError> {
        authorize_creation(creator.role(), Role::Student)?;
        let college_id = require_college(creator)?;

        if let Some(class_id) = dto.class_id {
            ensure_class_exists(db, class_id).await?;
        }

        let email = dto
            .email
            .clone()
            .unwrap_or_else(|| student_email(&dto.student_id));
        let password = dto
            .password
            .clone()
            .unwrap_or_else(|| initial_student_password(&dto.first_name, dto.birth_year));

        let mut tx = db.begin().await?;

        let account_id = AccountService::insert(
            &mut tx,
            NewAccount {
                email: &email,
                password: &password,
                role: Role::Student,
                first_name: &dto.first_name,
                last_name: dto.last_name.as_deref(),
                mobile: dto.mobile.as_deref(),
            },
        )
        .await?;

        let student_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO students (account_id, student_id, birth_year, college_id, class_id, created_by_teacher_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(account_id)
        .bind(dto.student_id.trim())
        .bind(dto.birth_year)
        .bind(college_id)
        .bind(dto.class_id)
        .bind(creator.teacher_id())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(student.student_id = %dto.student_id, "Student ID already registered");
                    return AppError::bad_request(anyhow::anyhow!(
                        "Student ID '{}' already exists",
                        dto.student_id.trim()
                    ));
                }
            }
            AppError::from(e)
        })?;

        let student = fetch_student(&mut tx, student_id).await?;
        tx.commit().await?;

        metrics::track_account_created(Role::Student);
        info!(student.id = %student.id, college.id = %college_id, "Student created");

        Ok(student)
    }

    #[instrument(skip(db, viewer, filters), fields(db.operation = "SELECT", db.table = "students"))]
    pub async fn list_students(
        db: &PgPool,
        viewer: &Account,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let college_id = college_scope_for_listing(viewer, filters.college_id);
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students
             WHERE ($1::uuid IS NULL OR college_id = $1)
               AND ($2::int IS NULL OR class_id = $2)",
        )
        .bind(college_id)
        .bind(filters.class_id)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "{} WHERE ($1::uuid IS NULL OR s.college_id = $1)
               AND ($2::int IS NULL OR s.class_id = $2)
             ORDER BY a.last_name, a.first_name LIMIT $3 OFFSET $4",
            STUDENT_SELECT
        ))
        .bind(college_id)
        .bind(filters.class_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        debug!(total, returned = students.len(), "Students fetched");

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db, viewer), fields(student.id = %id, db.table = "students"))]
    pub async fn get_student(db: &PgPool, viewer: &Account, id: Uuid) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!("{} WHERE s.id = $1", STUDENT_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        verify_college_access(viewer, student.college_id, "Student")?;
        Ok(student)
    }

    #[instrument(skip(db, viewer, dto), fields(student.id = %id, db.operation = "UPDATE"))]
    pub async fn update_student(
        db: &PgPool,
        viewer: &Account,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let current = Self::get_student(db, viewer, id).await?;

        if let Some(class_id) = dto.class_id {
            ensure_class_exists(db, class_id).await?;
        }

        let mut tx = db.begin().await?;

        sqlx::query(
            "UPDATE accounts SET first_name = $1, last_name = $2, mobile = $3, updated_at = NOW()
             WHERE id = $4",
        )
        .bind(dto.first_name.as_deref().unwrap_or(&current.first_name))
        .bind(dto.last_name.as_ref().or(current.last_name.as_ref()))
        .bind(dto.mobile.as_ref().or(current.mobile.as_ref()))
        .bind(current.account_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE students SET birth_year = $1, class_id = $2 WHERE id = $3")
            .bind(dto.birth_year.unwrap_or(current.birth_year))
            .bind(dto.class_id.or(current.class_id))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let student = fetch_student(&mut tx, id).await?;
        tx.commit().await?;

        Ok(student)
    }

    #[instrument(skip(db, viewer), fields(student.id = %id, db.operation = "DELETE"))]
    pub async fn delete_student(db: &PgPool, viewer: &Account, id: Uuid) -> Result<(), AppError> {
        let student = Self::get_student(db, viewer, id).await?;

        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(student.account_id)
            .execute(db)
            .await?;

        info!("Student deleted");
        Ok(())
    }

    /// Imports new students from CSV text. Rows that already exist are
    /// reported as duplicates and never touched.
    #[instrument(skip(db, importer, content), fields(importer.id = %importer.id()))]
    pub async fn import_students(
        db: &PgPool,
        importer: &Account,
        content: &str,
    ) -> Result<StudentImportReport, AppError> {
        authorize_creation(importer.role(), Role::Student)?;
        let college_id = require_college(importer)?;

        let rows = parse_students_csv(content)?;
        let (emails, student_ids) = candidate_keys(&rows);

        let ctx = ImportContext {
            college_id,
            known_classes: known_classes(db).await?,
            existing_emails: existing_emails(db, &emails).await?,
            existing_student_ids: existing_student_ids(db, &student_ids).await?,
        };

        let plan = plan_import(rows, &ctx);
        let prepared_count = plan.prepared.len();
        let mut duplicates = plan.duplicates;
        let mut errors = plan.errors;

        debug!(
            prepared = prepared_count,
            duplicates = duplicates.len(),
            errors = errors.len(),
            "Import planned"
        );

        let hashed = hash_all(plan.prepared).await?;
        let teacher_id = importer.teacher_id();

        let successful = insert_prepared(
            db,
            &hashed,
            college_id,
            teacher_id,
            &mut duplicates,
            &mut errors,
        )
        .await?;

        metrics::track_students_imported(successful, duplicates.len(), errors.len());
        info!(
            successful,
            duplicates = duplicates.len(),
            errors = errors.len(),
            "Student import finished"
        );

        Ok(StudentImportReport::new(
            successful,
            prepared_count,
            duplicates,
            errors,
        ))
    }

    /// Imports CSV text, creating new students and updating (or skipping)
    /// existing ones. All changes commit together.
    #[instrument(skip(db, importer, content), fields(importer.id = %importer.id()))]
    pub async fn import_with_update(
        db: &PgPool,
        importer: &Account,
        content: &str,
        update_existing: bool,
    ) -> Result<StudentUpsertReport, AppError> {
        authorize_creation(importer.role(), Role::Student)?;
        let college_id = require_college(importer)?;

        let rows = parse_students_csv(content)?;
        let (emails, student_ids) = candidate_keys(&rows);

        let ctx = UpsertContext {
            college_id,
            known_classes: known_classes(db).await?,
            taken_emails: existing_emails(db, &emails).await?,
            students_by_email: students_by_email(db, &emails).await?,
            existing_student_ids: existing_student_ids(db, &student_ids).await?,
        };

        let plan = plan_upsert(rows, &ctx, update_existing);
        let mut errors = plan.errors;
        let skipped = plan.skipped;

        let creates = hash_all(plan.creates).await?;
        let (update_ids, update_rows): (Vec<Uuid>, Vec<PreparedStudent>) =
            plan.updates.into_iter().unzip();
        let updates = update_ids
            .into_iter()
            .zip(hash_all(update_rows).await?)
            .collect::<Vec<_>>();

        let teacher_id = importer.teacher_id();
        let mut tx = db.begin().await?;
        let mut created = 0;
        let mut updated = 0;

        for (student, hash) in &creates {
            let mut savepoint = Connection::begin(&mut *tx).await?;
            match insert_one(&mut savepoint, student, hash, college_id, teacher_id).await {
                Ok(()) => {
                    savepoint.commit().await?;
                    created += 1;
                }
                Err(e) => errors.push(format!("Row {}: {}", student.row, e)),
            }
        }

        for (account_id, (student, hash)) in &updates {
            let mut savepoint = Connection::begin(&mut *tx).await?;
            match update_one(&mut savepoint, *account_id, student, hash).await {
                Ok(()) => {
                    savepoint.commit().await?;
                    updated += 1;
                }
                Err(e) => errors.push(format!("Row {}: {}", student.row, e)),
            }
        }

        tx.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit student import");
            AppError::internal_error("Failed to commit student import")
        })?;

        metrics::track_students_imported(created, 0, errors.len());
        info!(created, updated, skipped, errors = errors.len(), "Student upsert import finished");

        Ok(StudentUpsertReport::new(created, updated, skipped, errors))
    }
}

async fn fetch_student(conn: &mut PgConnection, id: Uuid) -> Result<Student, AppError> {
    let student = sqlx::query_as::<_, Student>(&format!("{} WHERE s.id = $1", STUDENT_SELECT))
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(student)
}

async fn ensure_class_exists(db: &PgPool, class_id: i32) -> Result<(), AppError> {
    if ClassService::exists(db, class_id).await? {
        Ok(())
    } else {
        Err(AppError::bad_request(anyhow::anyhow!(
            "Class {} does not exist",
            class_id
        )))
    }
}

async fn known_classes(db: &PgPool) -> Result<HashSet<i32>, AppError> {
    let ids = sqlx::query_scalar::<_, i32>("SELECT id FROM classes")
        .fetch_all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

async fn existing_emails(db: &PgPool, emails: &[String]) -> Result<HashSet<String>, AppError> {
    let found = sqlx::query_scalar::<_, String>("SELECT email FROM accounts WHERE email = ANY($1)")
        .bind(emails)
        .fetch_all(db)
        .await?;
    Ok(found.into_iter().collect())
}

async fn existing_student_ids(
    db: &PgPool,
    student_ids: &[String],
) -> Result<HashSet<String>, AppError> {
    let found =
        sqlx::query_scalar::<_, String>("SELECT student_id FROM students WHERE student_id = ANY($1)")
            .bind(student_ids)
            .fetch_all(db)
            .await?;
    Ok(found.into_iter().collect())
}

async fn students_by_email(
    db: &PgPool,
    emails: &[String],
) -> Result<HashMap<String, ExistingStudent>, AppError> {
    let rows = sqlx::query_as::<_, (String, Uuid, Uuid)>(
        "SELECT a.email, a.id, s.college_id
         FROM accounts a
         JOIN students s ON s.account_id = a.id
         WHERE a.email = ANY($1)",
    )
    .bind(emails)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(email, account_id, college_id)| {
            (
                email,
                ExistingStudent {
                    account_id,
                    college_id,
                },
            )
        })
        .collect())
}

/// bcrypt is slow on purpose; hash the whole batch on the blocking pool.
async fn hash_all(
    students: Vec<PreparedStudent>,
) -> Result<Vec<(PreparedStudent, String)>, AppError> {
    if students.is_empty() {
        return Ok(Vec::new());
    }

    tokio::task::spawn_blocking(move || {
        students
            .into_par_iter()
            .map(|student| hash_password(&student.password).map(|hash| (student, hash)))
            .collect::<Result<Vec<_>, AppError>>()
    })
    .await
    .map_err(|e| AppError::internal_error(format!("Password hashing task failed: {}", e)))?
}

fn is_constraint_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                || db_err.is_foreign_key_violation()
                || db_err.is_check_violation()
        }
        _ => false,
    }
}

/// Bulk insert, falling back to row-by-row inserts when the database rejects
/// the batch so the failing rows land in `duplicates` or `errors`.
async fn insert_prepared(
    db: &PgPool,
    students: &[(PreparedStudent, String)],
    college_id: Uuid,
    teacher_id: Option<Uuid>,
    duplicates: &mut Vec<String>,
    errors: &mut Vec<String>,
) -> Result<usize, AppError> {
    if students.is_empty() {
        return Ok(0);
    }

    match bulk_insert(db, students, college_id, teacher_id).await {
        Ok(count) => Ok(count),
        Err(sqlx::Error::Database(db_err)) => {
            warn!(error = %db_err, "Bulk insert rejected, retrying row by row");
            insert_individually(db, students, college_id, teacher_id, duplicates, errors).await
        }
        Err(e) => {
            error!(error = %e, "Bulk student insert failed");
            Err(AppError::from(e))
        }
    }
}

/// One multi-row statement for all accounts and students, in one transaction.
async fn bulk_insert(
    db: &PgPool,
    students: &[(PreparedStudent, String)],
    college_id: Uuid,
    teacher_id: Option<Uuid>,
) -> Result<usize, sqlx::Error> {
    let mut emails = Vec::with_capacity(students.len());
    let mut hashes = Vec::with_capacity(students.len());
    let mut first_names = Vec::with_capacity(students.len());
    let mut last_names = Vec::with_capacity(students.len());
    let mut student_ids = Vec::with_capacity(students.len());
    let mut birth_years = Vec::with_capacity(students.len());
    let mut class_ids = Vec::with_capacity(students.len());

    for (student, hash) in students {
        emails.push(student.email.clone());
        hashes.push(hash.clone());
        first_names.push(student.first_name.clone());
        last_names.push(student.last_name.clone());
        student_ids.push(student.student_id.clone());
        birth_years.push(student.birth_year);
        class_ids.push(student.class_id);
    }

    let mut tx = db.begin().await?;

    let inserted = sqlx::query(
        "WITH new_accounts AS (
            INSERT INTO accounts (email, password, role, first_name, last_name)
            SELECT e, p, 'student'::account_role, f, l
            FROM UNNEST($1::varchar[], $2::varchar[], $3::varchar[], $4::varchar[]) AS t(e, p, f, l)
            RETURNING id, email
         )
         INSERT INTO students (account_id, student_id, birth_year, college_id, class_id, created_by_teacher_id)
         SELECT na.id, r.sid, r.by, $7, r.cid, $8
         FROM UNNEST($1::varchar[], $5::varchar[], $6::int[], $9::int[]) AS r(e, sid, by, cid)
         JOIN new_accounts na ON na.email = r.e",
    )
    .bind(&emails)
    .bind(&hashes)
    .bind(&first_names)
    .bind(&last_names)
    .bind(&student_ids)
    .bind(&birth_years)
    .bind(college_id)
    .bind(teacher_id)
    .bind(&class_ids)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    Ok(inserted as usize)
}

/// Fallback after a failed bulk insert: each row in its own transaction.
async fn insert_individually(
    db: &PgPool,
    students: &[(PreparedStudent, String)],
    college_id: Uuid,
    teacher_id: Option<Uuid>,
    duplicates: &mut Vec<String>,
    errors: &mut Vec<String>,
) -> Result<usize, AppError> {
    let mut successful = 0;

    for (student, hash) in students {
        let mut tx = db.begin().await?;
        match insert_one(&mut tx, student, hash, college_id, teacher_id).await {
            Ok(()) => {
                tx.commit().await?;
                successful += 1;
            }
            Err(e) if is_constraint_violation(&e) => {
                duplicates.push(format!(
                    "Database constraint violation for email: {}",
                    student.email
                ));
            }
            Err(e) => {
                errors.push(format!(
                    "Row {}: Failed to insert student {}: {}",
                    student.row, student.email, e
                ));
            }
        }
    }

    Ok(successful)
}

async fn insert_one(
    conn: &mut PgConnection,
    student: &PreparedStudent,
    hash: &str,
    college_id: Uuid,
    teacher_id: Option<Uuid>,
) -> Result<(), sqlx::Error> {
    let account_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO accounts (email, password, role, first_name, last_name)
         VALUES ($1, $2, 'student', $3, $4)
         RETURNING id",
    )
    .bind(&student.email)
    .bind(hash)
    .bind(&student.first_name)
    .bind(&student.last_name)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO students (account_id, student_id, birth_year, college_id, class_id, created_by_teacher_id)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(account_id)
    .bind(&student.student_id)
    .bind(student.birth_year)
    .bind(college_id)
    .bind(student.class_id)
    .bind(teacher_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn update_one(
    conn: &mut PgConnection,
    account_id: Uuid,
    student: &PreparedStudent,
    hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE accounts SET first_name = $1, last_name = $2, password = $3, updated_at = NOW()
         WHERE id = $4",
    )
    .bind(&student.first_name)
    .bind(&student.last_name)
    .bind(hash)
    .bind(account_id)
    .execute(&mut *conn)
    .await?;

    // A row without a class keeps the student's current one.
    sqlx::query(
        "UPDATE students SET birth_year = $1, class_id = COALESCE($2, class_id) WHERE account_id = $3",
    )
        .bind(student.birth_year)
        .bind(student.class_id)
        .bind(account_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
