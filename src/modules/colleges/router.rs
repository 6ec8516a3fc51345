use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_college, delete_college, get_college, list_colleges};

pub fn init_colleges_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_college).get(list_colleges))
        .route("/{id}", get(get_college).delete(delete_college))
}
