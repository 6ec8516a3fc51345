use axum::{
    Router,
    middleware,
    routing::{delete, get, post},
};

use crate::middleware::role::{require_admin, require_superadmin};
use crate::state::AppState;

use super::controller::{
    admin_classes, grant_access, my_classes, revoke_access, revoke_all_access,
};

/// Grant management is superadmin only. The read routes are open to admins
/// and check ownership in the handler.
pub fn init_class_access_router(state: AppState) -> Router<AppState> {
    let manage = Router::new()
        .route("/grant", post(grant_access))
        .route("/revoke/{admin_id}/class/{class_id}", delete(revoke_access))
        .route("/revoke/{admin_id}/all", delete(revoke_all_access))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_superadmin,
        ));

    let read = Router::new()
        .route("/admin/{admin_id}/classes", get(admin_classes))
        .route("/my-classes", get(my_classes))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    manage.merge(read)
}
