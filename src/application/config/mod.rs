pub mod auth;
pub mod database;
pub mod mail;
pub mod server;
pub mod uploads;

use once_cell::sync::Lazy;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub auth: auth::AuthConfig,
    pub mail: mail::MailConfig,
    pub uploads: uploads::UploadsConfig,

    // Logging
    pub log_level: String,

    /// Base URL of the frontend, used for reset links and OAuth redirects.
    pub frontend_url: String,

    pub version: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: server::ServerConfig::from_env(),
            database: database::DatabaseConfig::from_env(),
            auth: auth::AuthConfig::from_env(),
            mail: mail::MailConfig::from_env(),
            uploads: uploads::UploadsConfig::from_env(),

            log_level: env::var("ETEEAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            frontend_url: env::var("ETEEAP_FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),

            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
