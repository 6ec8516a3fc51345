//! JWT claim structures.

use edutrack_models::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PASSWORD_RESET_PURPOSE: &str = "password_reset";

/// Claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Account ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iss: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Claims embedded in refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
    /// Unique token identifier
    pub jti: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetClaims {
    pub sub: String,
    pub email: String,
    pub purpose: String,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}
