//! # EduTrack Models
//!
//! Database rows, request DTOs and response bodies for the EduTrack API.
//!
//! - [`roles`]: the [`Role`] enum and the account creation hierarchy
//! - [`accounts`]: the single login identity, [`Account`]
//! - [`colleges`], [`admins`], [`teachers`], [`students`]: tenant and member records
//! - [`classes`]: classes and admin class-access grants
//! - [`videos`]: class-scoped YouTube videos
//! - [`auth`]: login, token and password bodies

pub mod accounts;
pub mod admins;
pub mod auth;
pub mod classes;
pub mod colleges;
pub mod roles;
pub mod students;
pub mod teachers;
pub mod videos;

pub use accounts::{Account, AccountProfile, AccountRow, StaffAccount, StaffProfile, StudentAccount};
pub use roles::{Role, authorize_creation};

/// Splits a full name into first name and optional remainder.
pub fn split_full_name(full_name: &str) -> (String, Option<String>) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, if rest.is_empty() { None } else { Some(rest) })
}
