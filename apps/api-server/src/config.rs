//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::JwtConfig;

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database: Self::database_from_env(),
            jwt: JwtConfig::from_env(),
        }
    }

    /// `DATABASE_URL` selects PostgreSQL; without it posts live in memory.
    #[cfg(feature = "postgres")]
    fn database_from_env() -> Option<DatabaseConfig> {
        env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(10),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(1),
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
