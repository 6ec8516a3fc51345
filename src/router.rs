use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::{
    require_admin, require_authenticated, require_staff, require_superadmin,
};
use crate::modules::admins::router::init_admins_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::class_access::router::init_class_access_router;
use crate::modules::classes::router::init_classes_router;
use crate::modules::colleges::router::init_colleges_router;
use crate::modules::students::router::init_students_router;
use crate::modules::teachers::router::init_teachers_router;
use crate::modules::videos::router::init_videos_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest(
                    "/colleges",
                    init_colleges_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_superadmin,
                    )),
                )
                .nest(
                    "/admins",
                    init_admins_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_superadmin,
                    )),
                )
                .nest(
                    "/teachers",
                    init_teachers_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/students",
                    init_students_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff)),
                )
                .nest(
                    "/classes",
                    init_classes_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_authenticated,
                    )),
                )
                .nest("/class-access", init_class_access_router(state.clone()))
                .nest(
                    "/videos",
                    init_videos_router(state.clone()).route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_authenticated,
                    )),
                ),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
