use axum::{Json, extract::State};
use edutrack_core::AppError;
use edutrack_models::classes::Class;

use crate::state::AppState;

use super::service::ClassService;

#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "All classes", body = Vec<Class>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<Class>>, AppError> {
    Ok(Json(ClassService::list_classes(&state.db).await?))
}
