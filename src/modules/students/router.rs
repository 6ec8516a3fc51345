use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_student, delete_student, get_student, import_students, import_students_with_update,
    list_students, update_student,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(list_students))
        .route("/import", post(import_students))
        .route("/import-with-update", post(import_students_with_update))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
