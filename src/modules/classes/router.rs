use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::list_classes;

pub fn init_classes_router() -> Router<AppState> {
    Router::new().route("/", get(list_classes))
}
