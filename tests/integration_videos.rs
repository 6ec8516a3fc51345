mod common;

use axum::http::StatusCode;
use common::{
    create_test_college, create_test_staff, create_test_student, get_auth_token, json_request,
    send, setup_test_app,
};
use edutrack::edutrack_models::Role;
use serde_json::{Value, json};
use sqlx::PgPool;

fn video(title: &str, youtube: &str, category: &str, class_id: i32) -> Value {
    json!({
        "title": title,
        "youtube_url": youtube,
        "category": category,
        "tags": ["algebra", " basics "],
        "difficulty": "Beginner",
        "class_id": class_id
    })
}

fn titles(body: &Value) -> Vec<String> {
    let mut titles: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    titles
}

async fn upload(app: &axum::Router, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, json_request("POST", "/api/videos", Some(token), Some(body))).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_normalizes_youtube_links(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let mut tx = pool.begin().await.unwrap();
    let superadmin = create_test_staff(&mut tx, Role::Superadmin, None, None).await;
    tx.commit().await.unwrap();
    let token = get_auth_token(&app, &superadmin.email, &superadmin.password).await;

    let (status, body) = upload(
        &app,
        &token,
        video("Fractions", "https://youtu.be/dQw4w9WgXcQ?t=10", "Math", 1),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["youtube_id"], "dQw4w9WgXcQ");
    assert_eq!(body["embedUrl"], "https://www.youtube.com/embed/dQw4w9WgXcQ");
    assert_eq!(body["tags"], json!(["algebra", "basics"]));

    let (status, body) = upload(&app, &token, video("Bad", "https://vimeo.com/123", "Math", 1)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid YouTube URL or ID");

    let (status, body) = upload(&app, &token, video("Nowhere", "dQw4w9WgXcQ", "Math", 42)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Class 42 not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_superadmin_manages_videos(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let mut tx = pool.begin().await.unwrap();
    let college_id = create_test_college(&mut tx, "Upload College").await;
    let superadmin = create_test_staff(&mut tx, Role::Superadmin, None, None).await;
    let admin = create_test_staff(&mut tx, Role::Admin, Some(college_id), None).await;
    tx.commit().await.unwrap();

    let admin_token = get_auth_token(&app, &admin.email, &admin.password).await;
    let (status, _) = upload(&app, &admin_token, video("Nope", "dQw4w9WgXcQ", "Math", 1)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = get_auth_token(&app, &superadmin.email, &superadmin.password).await;
    let (_, body) = upload(&app, &token, video("Keep", "dQw4w9WgXcQ", "Math", 1)).await;
    let path = format!("/api/videos/{}", body["id"].as_str().unwrap());

    let (status, _) = send(&app, json_request("DELETE", &path, Some(&admin_token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, json_request("DELETE", &path, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, json_request("DELETE", &path, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Video not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_visibility_follows_role(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let mut tx = pool.begin().await.unwrap();
    let college_id = create_test_college(&mut tx, "Visibility College").await;
    let superadmin = create_test_staff(&mut tx, Role::Superadmin, None, None).await;
    let admin_a = create_test_staff(&mut tx, Role::Admin, Some(college_id), None).await;
    let admin_b = create_test_staff(&mut tx, Role::Admin, Some(college_id), None).await;
    let teacher = create_test_staff(&mut tx, Role::Teacher, Some(college_id), Some("Math")).await;
    let student = create_test_student(&mut tx, college_id, Some(2)).await;
    create_test_student(&mut tx, college_id, Some(1)).await;
    tx.commit().await.unwrap();

    let token = get_auth_token(&app, &superadmin.email, &superadmin.password).await;
    for body in [
        video("Class 1 math", "aaaaaaaaaaa", "Math", 1),
        video("Class 2 science", "bbbbbbbbbbb", "Science", 2),
        video("Class 2 math", "ccccccccccc", "math", 2),
        video("Class 3 math", "ddddddddddd", "Math", 3),
    ] {
        let (status, _) = upload(&app, &token, body).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    for (admin, classes) in [(&admin_a, json!([1, 2])), (&admin_b, json!([3]))] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/class-access/grant",
                Some(&token),
                Some(json!({ "admin_id": admin.profile_id.unwrap(), "class_ids": classes })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, json_request("GET", "/api/videos", Some(&token), None)).await;
    assert_eq!(body.as_array().unwrap().len(), 4);

    let a_token = get_auth_token(&app, &admin_a.email, &admin_a.password).await;
    let (status, body) = send(&app, json_request("GET", "/api/videos", Some(&a_token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        vec!["Class 1 math", "Class 2 math", "Class 2 science"]
    );

    let (_, body) = send(
        &app,
        json_request("GET", "/api/videos?category=SCIENCE", Some(&a_token), None),
    )
    .await;
    assert_eq!(titles(&body), vec!["Class 2 science"]);

    let (status, body) = send(
        &app,
        json_request("GET", "/api/videos/class/3", Some(&a_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You do not have access to videos of class 3");

    let (status, _) = send(
        &app,
        json_request("GET", "/api/videos/class/99", Some(&a_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let b_token = get_auth_token(&app, &admin_b.email, &admin_b.password).await;
    let (_, body) = send(&app, json_request("GET", "/api/videos", Some(&b_token), None)).await;
    assert_eq!(titles(&body), vec!["Class 3 math"]);

    let student_token = get_auth_token(&app, &student.email, &student.password).await;
    let (_, body) = send(
        &app,
        json_request("GET", "/api/videos", Some(&student_token), None),
    )
    .await;
    assert_eq!(titles(&body), vec!["Class 2 math", "Class 2 science"]);

    let (status, _) = send(
        &app,
        json_request("GET", "/api/videos/class/1", Some(&student_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Teachers see their subject in classes their college's students attend.
    let teacher_token = get_auth_token(&app, &teacher.email, &teacher.password).await;
    let (_, body) = send(
        &app,
        json_request("GET", "/api/videos", Some(&teacher_token), None),
    )
    .await;
    assert_eq!(titles(&body), vec!["Class 1 math", "Class 2 math"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_without_grants_sees_nothing(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let mut tx = pool.begin().await.unwrap();
    let college_id = create_test_college(&mut tx, "Empty College").await;
    let superadmin = create_test_staff(&mut tx, Role::Superadmin, None, None).await;
    let admin = create_test_staff(&mut tx, Role::Admin, Some(college_id), None).await;
    let student = create_test_student(&mut tx, college_id, None).await;
    tx.commit().await.unwrap();

    let token = get_auth_token(&app, &superadmin.email, &superadmin.password).await;
    upload(&app, &token, video("Lonely", "dQw4w9WgXcQ", "Math", 1)).await;

    for account in [&admin, &student] {
        let token = get_auth_token(&app, &account.email, &account.password).await;
        let (status, body) = send(&app, json_request("GET", "/api/videos", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    let (status, _) = send(&app, json_request("GET", "/api/videos", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
