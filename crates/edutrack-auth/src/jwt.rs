//! Token creation and verification.
//!
//! Access and password reset tokens are signed with `JwtConfig::secret`,
//! refresh tokens with `JwtConfig::refresh_secret`. Every token carries the
//! configured issuer and verification rejects any other issuer.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use edutrack_config::JwtConfig;
use edutrack_core::AppError;
use edutrack_models::Role;

use crate::claims::{Claims, PASSWORD_RESET_PURPOSE, PasswordResetClaims, RefreshTokenClaims};

fn now() -> usize {
    Utc::now().timestamp() as usize
}

fn sign<T: Serialize>(claims: &T, secret: &str, what: &str) -> Result<String, AppError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create {}: {}", what, e)))
}

fn validation(issuer: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation
}

fn decode_with<T: DeserializeOwned>(
    token: &str,
    secret: &str,
    issuer: &str,
) -> Result<T, jsonwebtoken::errors::Error> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(issuer),
    )
    .map(|data| data.claims)
}

pub fn create_access_token(
    account_id: Uuid,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let iat = now();
    let claims = Claims {
        sub: account_id.to_string(),
        email: email.to_string(),
        role,
        iss: jwt_config.issuer.clone(),
        exp: iat + jwt_config.access_token_expiry as usize,
        iat,
    };

    sign(&claims, &jwt_config.secret, "token")
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode_with::<Claims>(token, &jwt_config.secret, &jwt_config.issuer)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

pub fn create_refresh_token(account_id: Uuid, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let iat = now();
    let claims = RefreshTokenClaims {
        sub: account_id.to_string(),
        iss: jwt_config.issuer.clone(),
        exp: iat + jwt_config.refresh_token_expiry as usize,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, &jwt_config.refresh_secret, "refresh token")
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, AppError> {
    decode_with::<RefreshTokenClaims>(token, &jwt_config.refresh_secret, &jwt_config.issuer)
        .map_err(|_| AppError::unauthorized("Invalid or expired refresh token"))
}

pub fn create_password_reset_token(
    account_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let iat = now();
    let claims = PasswordResetClaims {
        sub: account_id.to_string(),
        email: email.to_string(),
        purpose: PASSWORD_RESET_PURPOSE.to_string(),
        iss: jwt_config.issuer.clone(),
        exp: iat + jwt_config.reset_token_expiry as usize,
        iat,
    };

    sign(&claims, &jwt_config.secret, "reset token")
}

pub fn verify_password_reset_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<PasswordResetClaims, AppError> {
    let claims =
        decode_with::<PasswordResetClaims>(token, &jwt_config.secret, &jwt_config.issuer)
            .map_err(|_| AppError::unauthorized("Invalid or expired reset token"))?;

    if claims.purpose != PASSWORD_RESET_PURPOSE {
        return Err(AppError::unauthorized("Invalid reset token"));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            refresh_secret: "test-refresh-secret-at-least-32-characters".to_string(),
            issuer: "auth-backend".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            reset_token_expiry: 3600,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = get_test_jwt_config();
        let id = Uuid::new_v4();

        let token = create_access_token(id, "t@college.edu", Role::Teacher, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.email, "t@college.edu");
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.iss, "auth-backend");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        let err = verify_token("invalid-token", &config).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_access_token(Uuid::new_v4(), "a@b.io", Role::Admin, &config).unwrap();

        let wrong = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..get_test_jwt_config()
        };
        assert!(verify_token(&token, &wrong).is_err());
    }

    #[test]
    fn test_verify_token_wrong_issuer() {
        let config = get_test_jwt_config();
        let token = create_access_token(Uuid::new_v4(), "a@b.io", Role::Admin, &config).unwrap();

        let other = JwtConfig {
            issuer: "someone-else".to_string(),
            ..get_test_jwt_config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = get_test_jwt_config();
        let past = now() - 3600;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "old@college.edu".to_string(),
            role: Role::Student,
            iss: config.issuer.clone(),
            exp: past,
            iat: past - 900,
        };
        let token = sign(&claims, &config.secret, "token").unwrap();

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = get_test_jwt_config();
        let id = Uuid::new_v4();

        let refresh = create_refresh_token(id, &config).unwrap();
        assert!(verify_token(&refresh, &config).is_err());

        let claims = verify_refresh_token(&refresh, &config).unwrap();
        assert_eq!(claims.sub, id.to_string());
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let config = get_test_jwt_config();
        let access = create_access_token(Uuid::new_v4(), "a@b.io", Role::Admin, &config).unwrap();
        assert!(verify_refresh_token(&access, &config).is_err());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let config = get_test_jwt_config();
        let id = Uuid::new_v4();
        let a = verify_refresh_token(&create_refresh_token(id, &config).unwrap(), &config).unwrap();
        let b = verify_refresh_token(&create_refresh_token(id, &config).unwrap(), &config).unwrap();
        assert_ne!(a.jti, b.jti);
        assert!(a.exp > a.iat + config.access_token_expiry as usize);
    }

    #[test]
    fn test_password_reset_token() {
        let config = get_test_jwt_config();
        let id = Uuid::new_v4();

        let token = create_password_reset_token(id, "r@college.edu", &config).unwrap();
        let claims = verify_password_reset_token(&token, &config).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.purpose, PASSWORD_RESET_PURPOSE);

        // Not usable as an access token: no role claim.
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_password_reset_token_requires_purpose() {
        let config = get_test_jwt_config();
        let iat = now();
        let claims = PasswordResetClaims {
            sub: Uuid::new_v4().to_string(),
            email: "r@college.edu".to_string(),
            purpose: "email_verification".to_string(),
            iss: config.issuer.clone(),
            exp: iat + 600,
            iat,
        };
        let token = sign(&claims, &config.secret, "reset token").unwrap();

        assert!(verify_password_reset_token(&token, &config).is_err());
    }
}
