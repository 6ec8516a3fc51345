use axum::{
    Router,
    middleware,
    routing::{delete, get, post},
};

use crate::middleware::role::require_superadmin;
use crate::state::AppState;

use super::controller::{delete_video, list_class_videos, list_videos, upload_video};

/// Reads are open to every authenticated account and filtered by
/// visibility. Writes are superadmin only.
pub fn init_videos_router(state: AppState) -> Router<AppState> {
    let superadmin = || middleware::from_fn_with_state(state.clone(), require_superadmin);

    Router::new()
        .route(
            "/",
            get(list_videos).merge(post(upload_video).route_layer(superadmin())),
        )
        .route("/class/{class_id}", get(list_class_videos))
        .route("/{id}", delete(delete_video).route_layer(superadmin()))
}
