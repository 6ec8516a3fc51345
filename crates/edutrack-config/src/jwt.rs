use std::env;

/// Token signing settings. All expiries are in seconds.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub refresh_secret: String,
    pub issuer: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub reset_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string());
        let refresh_secret =
            env::var("JWT_REFRESH_SECRET").unwrap_or_else(|_| format!("{}-refresh", secret));

        let access_minutes: i64 = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15);
        let refresh_days: i64 = env::var("REFRESH_TOKEN_EXPIRE_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7);

        Self {
            secret,
            refresh_secret,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "auth-backend".to_string()),
            access_token_expiry: access_minutes * 60,
            refresh_token_expiry: refresh_days * 24 * 60 * 60,
            reset_token_expiry: 60 * 60,
        }
    }
}
