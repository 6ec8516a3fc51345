//! # EduTrack Config
//!
//! Configuration loaded from environment variables. Nothing here is global:
//! [`AppConfig::from_env`] builds one value that the binaries hand to
//! whatever needs it.
//!
//! - [`server`]: bind host and port
//! - [`database`]: connection string, pool size, migrations
//! - [`jwt`]: token secrets, issuer and lifetimes
//! - [`email`]: SMTP settings
//! - [`cors`]: allowed origins
//! - [`bootstrap`]: initial superadmin and class seeding
//! - [`observability`]: metrics toggle and log directory

pub mod bootstrap;
pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod observability;
pub mod server;

pub use bootstrap::BootstrapConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use observability::ObservabilityConfig;
pub use server::ServerConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub cors: CorsConfig,
    pub bootstrap: BootstrapConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env(),
            email: EmailConfig::from_env(),
            cors: CorsConfig::from_env(),
            bootstrap: BootstrapConfig::from_env(),
            observability: ObservabilityConfig::from_env(),
        })
    }
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
