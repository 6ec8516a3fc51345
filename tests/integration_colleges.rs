mod common;

use axum::http::StatusCode;
use common::{
    create_test_college, create_test_staff, generate_unique_college_name, generate_unique_email,
    get_auth_token, json_request, send, setup_test_app,
};
use edutrack::edutrack_models::Role;
use serde_json::json;
use sqlx::PgPool;

async fn superadmin_token(pool: &PgPool, app: &axum::Router) -> String {
    let mut tx = pool.begin().await.unwrap();
    let superadmin = create_test_staff(&mut tx, Role::Superadmin, None, None).await;
    tx.commit().await.unwrap();
    get_auth_token(app, &superadmin.email, &superadmin.password).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_college_with_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = superadmin_token(&pool, &app).await;
    let admin_email = generate_unique_email();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/colleges",
            Some(&token),
            Some(json!({
                "name": "Riverside College",
                "admin": {
                    "full_name": "Grace Hopper",
                    "email": admin_email,
                    "password": "adminpass123"
                }
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["college"]["name"], "Riverside College");
    assert_eq!(body["admin"]["email"], admin_email);
    assert_eq!(body["admin"]["college_id"], body["college"]["id"]);

    // The new admin can log in straight away.
    get_auth_token(&app, &admin_email, "adminpass123").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_college_rolls_back_on_duplicate_admin_email(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = superadmin_token(&pool, &app).await;

    let mut tx = pool.begin().await.unwrap();
    let existing = create_test_staff(&mut tx, Role::Superadmin, None, None).await;
    tx.commit().await.unwrap();

    let name = generate_unique_college_name();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/colleges",
            Some(&token),
            Some(json!({
                "name": name,
                "admin": { "full_name": "Dup Admin", "email": existing.email }
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Admin with this email already exists");

    let colleges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colleges WHERE name = $1")
        .bind(&name)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(colleges, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_college_name(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = superadmin_token(&pool, &app).await;

    let mut tx = pool.begin().await.unwrap();
    create_test_college(&mut tx, "Taken College").await;
    tx.commit().await.unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/colleges",
            Some(&token),
            Some(json!({ "name": "Taken College" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "College name already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_colleges_are_superadmin_only(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let mut tx = pool.begin().await.unwrap();
    let college_id = create_test_college(&mut tx, "Guarded College").await;
    let admin = create_test_staff(&mut tx, Role::Admin, Some(college_id), None).await;
    tx.commit().await.unwrap();

    let token = get_auth_token(&app, &admin.email, &admin.password).await;
    let (status, _) = send(&app, json_request("GET", "/api/colleges", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/colleges", Some(&token), Some(json!({ "name": "X" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_and_delete_college(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = superadmin_token(&pool, &app).await;

    let mut tx = pool.begin().await.unwrap();
    let busy = create_test_college(&mut tx, "Busy College").await;
    create_test_staff(&mut tx, Role::Admin, Some(busy), None).await;
    let empty = create_test_college(&mut tx, "Empty College").await;
    tx.commit().await.unwrap();

    let (status, body) = send(
        &app,
        json_request("GET", &format!("/api/colleges/{}", busy), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin_count"], 1);

    let (status, _) = send(
        &app,
        json_request("DELETE", &format!("/api/colleges/{}", busy), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        json_request("DELETE", &format!("/api/colleges/{}", empty), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        json_request("GET", &format!("/api/colleges/{}", empty), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_admin_by_college_name(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = superadmin_token(&pool, &app).await;
    let name = generate_unique_college_name();

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/admins",
                Some(&token),
                Some(json!({
                    "full_name": "Named Admin",
                    "email": generate_unique_email(),
                    "college_name": name
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let colleges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colleges WHERE name = $1")
        .bind(&name)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(colleges, 1);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/admins",
            Some(&token),
            Some(json!({ "full_name": "Lost Admin", "email": generate_unique_email() })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Either college_id or college_name is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_admin_removes_account(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = superadmin_token(&pool, &app).await;

    let mut tx = pool.begin().await.unwrap();
    let college_id = create_test_college(&mut tx, "Admin Delete College").await;
    let admin = create_test_staff(&mut tx, Role::Admin, Some(college_id), None).await;
    tx.commit().await.unwrap();

    let admin_id = admin.profile_id.unwrap();
    let (status, _) = send(
        &app,
        json_request("DELETE", &format!("/api/admins/{}", admin_id), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE id = $1")
        .bind(admin.account_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 0);
}
