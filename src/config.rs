//! Configuration module for environment variables and application settings

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Sessions last 30 days unless overridden.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration; `None` selects the in-memory store
    pub database: Option<DatabaseSettings>,

    /// Session configuration
    pub session: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: usize,
    pub tls: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Some(DatabaseSettings {
                url,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 16)?,
                tls: parse_var("DATABASE_TLS", false)?,
            }),
            _ => None,
        };

        // $PORT wins (Heroku-style hosts), then SERVER_PORT
        let port = match env::var("PORT") {
            Ok(port) => port.parse().context("PORT must be a valid port number")?,
            Err(_) => parse_var("SERVER_PORT", 3000)?,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3001".to_string())
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect(),
            },
            database,
            session: SessionConfig {
                ttl: Duration::from_secs(parse_var("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?),
            },
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
/// A set but malformed value is an error rather than a silent default.
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_when_unset() {
        let value: u64 = parse_var("CONTACT_SERVER_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_default_ttl_is_thirty_days() {
        assert_eq!(DEFAULT_SESSION_TTL_SECS, 2_592_000);
    }
}
