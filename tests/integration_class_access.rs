mod common;

use axum::http::StatusCode;
use common::{
    TestAccount, create_test_college, create_test_staff, get_auth_token, json_request, send,
    setup_test_app,
};
use edutrack::edutrack_models::Role;
use serde_json::json;
use sqlx::PgPool;

struct Fixture {
    app: axum::Router,
    superadmin_token: String,
    admin: TestAccount,
    other_admin: TestAccount,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let app = setup_test_app(pool.clone()).await;

    let mut tx = pool.begin().await.unwrap();
    let college_id = create_test_college(&mut tx, "Access College").await;
    let superadmin = create_test_staff(&mut tx, Role::Superadmin, None, None).await;
    let admin = create_test_staff(&mut tx, Role::Admin, Some(college_id), None).await;
    let other_admin = create_test_staff(&mut tx, Role::Admin, Some(college_id), None).await;
    tx.commit().await.unwrap();

    let superadmin_token = get_auth_token(&app, &superadmin.email, &superadmin.password).await;

    Fixture {
        app,
        superadmin_token,
        admin,
        other_admin,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grant_is_additive_and_idempotent(pool: PgPool) {
    let f = fixture(&pool).await;
    let admin_id = f.admin.profile_id.unwrap();

    let (status, body) = send(
        &f.app,
        json_request(
            "POST",
            "/api/class-access/grant",
            Some(&f.superadmin_token),
            Some(json!({ "admin_id": admin_id, "class_ids": [3, 1, 3] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["newly_granted"], json!([1, 3]));
    assert_eq!(body["already_granted"], json!([]));

    let (status, body) = send(
        &f.app,
        json_request(
            "POST",
            "/api/class-access/grant",
            Some(&f.superadmin_token),
            Some(json!({ "admin_id": admin_id, "class_ids": [3, 5] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newly_granted"], json!([5]));
    assert_eq!(body["already_granted"], json!([3]));
    assert_eq!(body["current_access"], json!([1, 3, 5]));

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM admin_class_access WHERE admin_id = $1 AND class_id = 3",
    )
    .bind(admin_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grant_rejects_unknown_targets(pool: PgPool) {
    let f = fixture(&pool).await;

    let (status, body) = send(
        &f.app,
        json_request(
            "POST",
            "/api/class-access/grant",
            Some(&f.superadmin_token),
            Some(json!({ "admin_id": f.admin.profile_id.unwrap(), "class_ids": [2, 14, 13] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Classes not found: 13, 14");

    let (status, body) = send(
        &f.app,
        json_request(
            "POST",
            "/api/class-access/grant",
            Some(&f.superadmin_token),
            Some(json!({ "admin_id": uuid::Uuid::new_v4(), "class_ids": [1] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Admin not found");

    // Nothing was written by the failed grants.
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_class_access")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_superadmin_grants(pool: PgPool) {
    let f = fixture(&pool).await;
    let token = get_auth_token(&f.app, &f.admin.email, &f.admin.password).await;

    let (status, _) = send(
        &f.app,
        json_request(
            "POST",
            "/api/class-access/grant",
            Some(&token),
            Some(json!({ "admin_id": f.admin.profile_id.unwrap(), "class_ids": [1] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revoke_single_and_all(pool: PgPool) {
    let f = fixture(&pool).await;
    let admin_id = f.admin.profile_id.unwrap();

    send(
        &f.app,
        json_request(
            "POST",
            "/api/class-access/grant",
            Some(&f.superadmin_token),
            Some(json!({ "admin_id": admin_id, "class_ids": [1, 2, 3] })),
        ),
    )
    .await;

    let (status, _) = send(
        &f.app,
        json_request(
            "DELETE",
            &format!("/api/class-access/revoke/{}/class/2", admin_id),
            Some(&f.superadmin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &f.app,
        json_request(
            "DELETE",
            &format!("/api/class-access/revoke/{}/class/2", admin_id),
            Some(&f.superadmin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Access not found");

    let (status, body) = send(
        &f.app,
        json_request(
            "DELETE",
            &format!("/api/class-access/revoke/{}/all", admin_id),
            Some(&f.superadmin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revoked_count"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admins_see_only_their_own_access(pool: PgPool) {
    let f = fixture(&pool).await;
    let admin_id = f.admin.profile_id.unwrap();

    send(
        &f.app,
        json_request(
            "POST",
            "/api/class-access/grant",
            Some(&f.superadmin_token),
            Some(json!({ "admin_id": admin_id, "class_ids": [7, 4] })),
        ),
    )
    .await;

    let token = get_auth_token(&f.app, &f.admin.email, &f.admin.password).await;

    let (status, body) = send(
        &f.app,
        json_request("GET", "/api/class-access/my-classes", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let ids: Vec<i64> = body["classes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 7]);

    let (status, _) = send(
        &f.app,
        json_request(
            "GET",
            &format!("/api/class-access/admin/{}/classes", admin_id),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let other_token = get_auth_token(&f.app, &f.other_admin.email, &f.other_admin.password).await;
    let (status, body) = send(
        &f.app,
        json_request(
            "GET",
            &format!("/api/class-access/admin/{}/classes", admin_id),
            Some(&other_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You can only view your own class access");

    let (status, body) = send(
        &f.app,
        json_request("GET", "/api/class-access/my-classes", Some(&other_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classes"], json!([]));
}
