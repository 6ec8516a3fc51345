use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use edutrack::edutrack_config::{CorsConfig, EmailConfig, JwtConfig};
use edutrack::edutrack_core::hash_password;
use edutrack::edutrack_models::Role;
use edutrack::router::init_router;
use edutrack::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestAccount {
    pub account_id: Uuid,
    /// Row id in admins, teachers or students. `None` for superadmins.
    pub profile_id: Option<Uuid>,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub college_id: Option<Uuid>,
}

pub fn test_state(pool: PgPool) -> AppState {
    dotenvy::dotenv().ok();
    AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::disabled(),
        cors_config: CorsConfig::from_env(),
    }
}

pub async fn setup_test_app(pool: PgPool) -> Router {
    edutrack::edutrack_db::seed::seed_default_classes(&pool)
        .await
        .unwrap();
    init_router(test_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_college_name() -> String {
    format!("Test College {}", Uuid::new_v4())
}

#[allow(dead_code)]
pub async fn create_test_college(tx: &mut Transaction<'_, Postgres>, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO colleges (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(&mut **tx)
        .await
        .unwrap()
}

async fn insert_account(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    password: &str,
    role: Role,
) -> Uuid {
    let hashed = hash_password(password).unwrap();
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO accounts (email, password, role, first_name, last_name)
         VALUES ($1, $2, $3, 'Test', 'User')
         RETURNING id",
    )
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

/// Creates a staff account with its profile row. Teachers get `subject`.
#[allow(dead_code)]
pub async fn create_test_staff(
    tx: &mut Transaction<'_, Postgres>,
    role: Role,
    college_id: Option<Uuid>,
    subject: Option<&str>,
) -> TestAccount {
    let email = generate_unique_email();
    let password = "testpass123".to_string();
    let account_id = insert_account(tx, &email, &password, role).await;

    let profile_id = match role {
        Role::Superadmin => None,
        Role::Admin => Some(
            sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO admins (account_id, college_id) VALUES ($1, $2) RETURNING id",
            )
            .bind(account_id)
            .bind(college_id.expect("admins need a college"))
            .fetch_one(&mut **tx)
            .await
            .unwrap(),
        ),
        Role::Teacher => Some(
            sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO teachers (account_id, college_id, subject) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(account_id)
            .bind(college_id.expect("teachers need a college"))
            .bind(subject)
            .fetch_one(&mut **tx)
            .await
            .unwrap(),
        ),
        Role::Student => panic!("use create_test_student"),
    };

    TestAccount {
        account_id,
        profile_id,
        email,
        password,
        role,
        college_id,
    }
}

#[allow(dead_code)]
pub async fn create_test_student(
    tx: &mut Transaction<'_, Postgres>,
    college_id: Uuid,
    class_id: Option<i32>,
) -> TestAccount {
    let email = generate_unique_email();
    let password = "studentpass".to_string();
    let account_id = insert_account(tx, &email, &password, Role::Student).await;

    let student_code = format!("S-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let profile_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO students (account_id, student_id, birth_year, college_id, class_id)
         VALUES ($1, $2, 2010, $3, $4)
         RETURNING id",
    )
    .bind(account_id)
    .bind(&student_code)
    .bind(college_id)
    .bind(class_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestAccount {
        account_id,
        profile_id: Some(profile_id),
        email,
        password,
        role: Role::Student,
        college_id: Some(college_id),
    }
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub fn csv_upload_request(uri: &str, token: &str, file_name: &str, csv: &str) -> Request<Body> {
    let boundary = "edutrack-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = boundary,
        f = file_name,
        csv = csv
    );

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[allow(dead_code)]
pub async fn get_auth_token(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}
