use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_admin, delete_admin, get_admin, list_admins, update_admin};

pub fn init_admins_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_admin).get(list_admins))
        .route(
            "/{id}",
            get(get_admin).put(update_admin).delete(delete_admin),
        )
}
