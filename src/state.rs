use edutrack_config::{AppConfig, CorsConfig, EmailConfig, JwtConfig};
use sqlx::PgPool;

use crate::utils::email::EmailService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn from_config(config: &AppConfig, db: PgPool) -> Self {
        Self {
            db,
            jwt_config: config.jwt.clone(),
            email_config: config.email.clone(),
            cors_config: config.cors.clone(),
        }
    }

    pub fn email_service(&self) -> EmailService {
        EmailService::new(self.email_config.clone())
    }
}
