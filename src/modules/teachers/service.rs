use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, TEACHER_SELECT, Teacher, TeacherFilterParams,
    UpdateTeacherDto,
};
use edutrack_models::{Account, Role, authorize_creation, split_full_name};
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::metrics;
use crate::modules::accounts::service::{AccountService, NewAccount, generate_password};
use crate::utils::auth_helpers::{college_scope_for_listing, require_college, verify_college_access};
use crate::utils::email::{EmailService, notify_new_account};

pub struct TeacherService;

impl TeacherService {
    /// Creates a teacher in the creator's college.
    #[instrument(skip(db, creator, dto, email_service), fields(teacher.email = %dto.email, db.table = "teachers"))]
    pub async fn create_teacher(
        db: &PgPool,
        creator: &Account,
        dto: CreateTeacherDto,
        email_service: &EmailService,
    ) -> Result<Teacher, AppError> {
        authorize_creation(creator.role(), Role::Teacher)?;
        let college_id = require_college(creator)?;

        let (first_name, last_name) = split_full_name(&dto.full_name);
        let password = dto.password.clone().unwrap_or_else(generate_password);

        let mut tx = db.begin().await?;

        let account_id = AccountService::insert(
            &mut tx,
            NewAccount {
                email: &dto.email,
                password: &password,
                role: Role::Teacher,
                first_name: &first_name,
                last_name: last_name.as_deref(),
                mobile: dto.mobile.as_deref(),
            },
        )
        .await?;

        let teacher_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO teachers (account_id, college_id, subject, created_by_admin_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(account_id)
        .bind(college_id)
        .bind(dto.subject.as_deref().map(str::trim))
        .bind(creator.admin_id())
        .fetch_one(&mut *tx)
        .await?;

        let teacher = sqlx::query_as::<_, Teacher>(&format!("{} WHERE t.id = $1", TEACHER_SELECT))
            .bind(teacher_id)
            .fetch_one(&mut *tx)
            .await?;

        let college_name = sqlx::query_scalar::<_, String>("SELECT name FROM colleges WHERE id = $1")
            .bind(college_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        metrics::track_account_created(Role::Teacher);
        info!(teacher.id = %teacher.id, college.id = %college_id, "Teacher created");

        notify_new_account(
            email_service,
            &teacher.email,
            &teacher.full_name,
            Role::Teacher,
            &college_name,
            &password,
        )
        .await;

        Ok(teacher)
    }

    #[instrument(skip(db, viewer, filters), fields(db.operation = "SELECT", db.table = "teachers"))]
    pub async fn list_teachers(
        db: &PgPool,
        viewer: &Account,
        filters: TeacherFilterParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        let college_id = college_scope_for_listing(viewer, filters.college_id);
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM teachers WHERE ($1::uuid IS NULL OR college_id = $1)",
        )
        .bind(college_id)
        .fetch_one(db)
        .await?;

        let teachers = sqlx::query_as::<_, Teacher>(&format!(
            "{} WHERE ($1::uuid IS NULL OR t.college_id = $1)
             ORDER BY a.first_name, a.last_name LIMIT $2 OFFSET $3",
            TEACHER_SELECT
        ))
        .bind(college_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        debug!(total, returned = teachers.len(), "Teachers fetched");

        Ok(PaginatedTeachersResponse {
            data: teachers,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db, viewer), fields(teacher.id = %teacher_id, db.table = "teachers"))]
    pub async fn get_teacher(
        db: &PgPool,
        viewer: &Account,
        teacher_id: Uuid,
    ) -> Result<Teacher, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(&format!("{} WHERE t.id = $1", TEACHER_SELECT))
            .bind(teacher_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

        verify_college_access(viewer, teacher.college_id, "Teacher")?;
        Ok(teacher)
    }

    #[instrument(skip(db, viewer, dto), fields(teacher.id = %teacher_id, db.operation = "UPDATE"))]
    pub async fn update_teacher(
        db: &PgPool,
        viewer: &Account,
        teacher_id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let current = Self::get_teacher(db, viewer, teacher_id).await?;

        let (first_name, last_name) =
            split_full_name(dto.full_name.as_deref().unwrap_or(&current.full_name));
        let mobile = dto.mobile.or(current.mobile);
        let subject = dto.subject.or(current.subject);

        let mut tx = db.begin().await?;

        sqlx::query(
            "UPDATE accounts SET first_name = $1, last_name = $2, mobile = $3, updated_at = NOW()
             WHERE id = $4",
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&mobile)
        .bind(current.account_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE teachers SET subject = $1 WHERE id = $2")
            .bind(&subject)
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Self::get_teacher(db, viewer, teacher_id).await
    }

    #[instrument(skip(db, viewer), fields(teacher.id = %teacher_id, db.operation = "DELETE"))]
    pub async fn delete_teacher(
        db: &PgPool,
        viewer: &Account,
        teacher_id: Uuid,
    ) -> Result<(), AppError> {
        let teacher = Self::get_teacher(db, viewer, teacher_id).await?;

        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(teacher.account_id)
            .execute(db)
            .await?;

        info!("Teacher deleted");
        Ok(())
    }
}
