//! Configuration management.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first to pick up a `.env` file.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Signing secret used when `JWT_SECRET` is unset. Development only.
pub const DEV_JWT_SECRET: &str = "cowork-development-secret";

/// Invalid configuration value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid value '{value}' for {key}")]
pub struct ConfigError {
    /// Environment variable name
    pub key: &'static str,
    /// Rejected value
    pub value: String,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server
    pub server: ServerConfig,
    /// `PostgreSQL`; `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,
    /// Bearer tokens
    pub auth: AuthConfig,
    /// Maximum reservations per non-admin user
    pub reservation_quota: usize,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: IpAddr,
    /// Port to bind to
    pub port: u16,
    /// Prometheus exporter port
    pub metrics_port: u16,
}

impl ServerConfig {
    /// HTTP listen address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Metrics listen address.
    #[must_use]
    pub const fn metrics_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.metrics_port)
    }
}

/// `PostgreSQL` configuration
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Authentication configuration
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens
    pub jwt_secret: String,
    /// Token lifetime
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// Whether the development secret is in use.
    #[must_use]
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparsable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parse = |key: &'static str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: number(&parse, "DATABASE_MAX_CONNECTIONS", "10")?,
                connect_timeout: Duration::from_secs(number(&parse, "DATABASE_CONNECT_TIMEOUT", "30")?),
            }),
            None => None,
        };

        Ok(Self {
            server: ServerConfig {
                host: number(&parse, "HOST", "0.0.0.0")?,
                port: number(&parse, "PORT", "5000")?,
                metrics_port: number(&parse, "METRICS_PORT", "9090")?,
            },
            database,
            auth: AuthConfig {
                jwt_secret: parse("JWT_SECRET", DEV_JWT_SECRET),
                token_ttl: Duration::from_secs(number(&parse, "JWT_EXPIRE_SECS", "2592000")?),
            },
            reservation_quota: number(&parse, "RESERVATION_QUOTA", "3")?,
        })
    }
}

fn number<T: FromStr>(
    parse: &impl Fn(&'static str, &str) -> String,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = parse(key, default);
    raw.trim().parse().map_err(|_| ConfigError { key, value: raw })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server.addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.server.metrics_port, 9090);
        assert_eq!(config.database, None);
        assert_eq!(config.reservation_quota, 3);
        assert_eq!(config.auth.token_ttl, Duration::from_secs(30 * 24 * 60 * 60));
        assert!(config.auth.uses_dev_secret());
    }

    #[test]
    fn test_database_settings() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/cowork"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ])
        .unwrap();
        let database = config.database.unwrap();
        assert_eq!(database.url, "postgres://localhost/cowork");
        assert_eq!(database.max_connections, 4);
        assert_eq!(database.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        assert_eq!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError {
                key: "PORT",
                value: "eighty".to_string()
            })
        );
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = load(&[("JWT_SECRET", "hunter2"), ("RESERVATION_QUOTA", "5")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
        assert_eq!(config.reservation_quota, 5);
        assert!(!config.auth.uses_dev_secret());
    }
}
