//! # EduTrack Core
//!
//! Foundational types shared by every EduTrack crate:
//!
//! - [`errors`]: the [`AppError`] type and its HTTP response conversion
//! - [`pagination`]: limit/offset and page-based pagination helpers
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: query-string friendly deserializers
//!
//! # Example
//!
//! ```ignore
//! use edutrack_core::{AppError, hash_password};
//!
//! let hash = hash_password("secret")?;
//! let err = AppError::forbidden("Role teacher cannot create admin accounts");
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
