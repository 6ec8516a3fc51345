use std::env;

use crate::env_flag;

/// Startup seeding: the initial superadmin and the default class set.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
    pub seed_classes: bool,
}

impl BootstrapConfig {
    pub fn from_env() -> Self {
        Self {
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty()),
            admin_password: env::var("ADMIN_PASS").ok().filter(|v| !v.is_empty()),
            admin_name: env::var("ADMIN_USER").unwrap_or_else(|_| "Super Admin".to_string()),
            seed_classes: env_flag("SEED_CLASSES", true),
        }
    }

    /// Email and password of the bootstrap superadmin, when both are set.
    pub fn superadmin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}
