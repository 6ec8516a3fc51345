//! # EduTrack Auth
//!
//! JWT claims and token helpers.
//!
//! Three token kinds are issued:
//!
//! - **Access token** ([`Claims`]): carries the account id, email and role
//! - **Refresh token** ([`RefreshTokenClaims`]): signed with a separate secret
//! - **Password reset token** ([`PasswordResetClaims`]): one hour, purpose-tagged
//!
//! ```ignore
//! use edutrack_auth::{create_access_token, verify_token};
//!
//! let token = create_access_token(account_id, "admin@college.edu", Role::Admin, &jwt_config)?;
//! let claims = verify_token(&token, &jwt_config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{Claims, PASSWORD_RESET_PURPOSE, PasswordResetClaims, RefreshTokenClaims};
pub use jwt::{
    create_access_token, create_password_reset_token, create_refresh_token,
    verify_password_reset_token, verify_refresh_token, verify_token,
};
