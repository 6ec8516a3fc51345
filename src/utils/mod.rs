//! Shared helpers for the HTTP layer.
//!
//! - [`auth_helpers`]: college scoping for the calling account
//! - [`email`]: SMTP notifications
//! - [`youtube`]: video id extraction from YouTube URLs

pub mod auth_helpers;
pub mod email;
pub mod youtube;
