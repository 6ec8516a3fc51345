//! Authentication extractors and role guards.
//!
//! - [`auth`]: [`auth::AuthUser`] decodes the bearer token,
//!   [`auth::CurrentAccount`] additionally loads the [`Account`](edutrack_models::Account)
//! - [`role`]: route-layer middleware that admits a fixed set of roles
//!
//! ```ignore
//! Router::new()
//!     .nest("/colleges", init_colleges_router()
//!         .route_layer(middleware::from_fn_with_state(state.clone(), require_superadmin)))
//! ```

pub mod auth;
pub mod role;
