//! # EduTrack API
//!
//! A multi-college learning backend built with Axum and PostgreSQL. Colleges
//! are run by admins, admins create teachers, staff create or bulk-import
//! students, and a superadmin curates YouTube videos per class.
//!
//! ## Role Hierarchy
//!
//! ```text
//! Superadmin (bootstrapped from env or the CLI, no college)
//!     ↓ creates
//! Colleges + Admins
//!     ↓ create
//! Teachers
//!     ↓ create / import
//! Students
//! ```
//!
//! Admins also create students directly. Every non-superadmin account is
//! scoped to one college and never sees another college's records.
//!
//! ## Video Visibility
//!
//! Videos belong to one of the fixed classes "1" through "12". Who sees
//! them is decided when they are queried, see
//! [`modules::videos::visibility`]:
//!
//! - superadmins see everything
//! - admins see classes granted through `/api/class-access`
//! - teachers see classes their college has students in, limited to their subject
//! - students see their own class
//!
//! ## Layout
//!
//! Each feature module under [`modules`] has a `controller.rs` with the
//! HTTP handlers, a `service.rs` with queries and business rules, and a
//! `router.rs`. Request and response types live in `edutrack-models`.
//!
//! API documentation is served at `/swagger-ui` and `/scalar`.

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

pub use edutrack_auth;
pub use edutrack_config;
pub use edutrack_core;
pub use edutrack_db;
pub use edutrack_models;
