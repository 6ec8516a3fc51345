//! Account roles and the creation hierarchy.
//!
//! ```text
//! superadmin ──creates──▶ admin
//! admin      ──creates──▶ teacher, student
//! teacher    ──creates──▶ student
//! student    ──creates──▶ (nothing)
//! ```

use std::fmt;
use std::str::FromStr;

use edutrack_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Superadmin, Role::Admin, Role::Teacher, Role::Student];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Capitalized name for user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Role::Superadmin => "Superadmin",
            Role::Admin => "Admin",
            Role::Teacher => "Teacher",
            Role::Student => "Student",
        }
    }

    /// Roles an account of this role may create.
    pub fn creatable_roles(self) -> &'static [Role] {
        match self {
            Role::Superadmin => &[Role::Admin],
            Role::Admin => &[Role::Teacher, Role::Student],
            Role::Teacher => &[Role::Student],
            Role::Student => &[],
        }
    }

    pub fn can_create(self, target: Role) -> bool {
        self.creatable_roles().contains(&target)
    }

    pub fn hierarchy_level(self) -> u8 {
        match self {
            Role::Superadmin => 3,
            Role::Admin => 2,
            Role::Teacher => 1,
            Role::Student => 0,
        }
    }
}

/// Fails with 403 unless `creator` may create accounts of `target` role.
pub fn authorize_creation(creator: Role, target: Role) -> Result<(), AppError> {
    if creator.can_create(target) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Role {} cannot create {} accounts",
            creator, target
        )))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "superadmin" => Ok(Role::Superadmin),
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}
