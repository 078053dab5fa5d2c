//! Application configuration management.
//!
//! Settings come from optional `config/default` and `config/{RUN_MODE}` files,
//! then plain environment variables (`PORT`, `JWT_SECRET`, `DB_HOST`, ...).

use serde::Deserialize;

use crate::jwt::{DEFAULT_SECRET, TokenConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token configuration.
    pub jwt: TokenConfig,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

/// Database configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    pub min_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[hidden]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

/// Accepted token lifetimes in hours (one hour up to one year).
const EXPIRE_HOURS_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

/// Flat key set as it appears in the environment.
#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_secret")]
    jwt_secret: String,
    #[serde(default = "default_expire_hours")]
    jwt_expire_hours: i64,
    database_url: Option<String>,
    #[serde(default = "default_db_host")]
    db_host: String,
    #[serde(default = "default_db_user")]
    db_user: String,
    #[serde(default = "default_db_password")]
    db_password: String,
    #[serde(default = "default_db_name")]
    db_name: String,
    #[serde(default = "default_db_port")]
    db_port: u16,
    #[serde(default = "default_max_connections")]
    db_max_connections: u32,
    #[serde(default = "default_min_connections")]
    db_min_connections: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_secret() -> String {
    DEFAULT_SECRET.to_string()
}

fn default_expire_hours() -> i64 {
    24
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "tally".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl From<RawSettings> for AppConfig {
    fn from(raw: RawSettings) -> Self {
        let url = raw.database_url.unwrap_or_else(|| {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                raw.db_user, raw.db_password, raw.db_host, raw.db_port, raw.db_name
            )
        });

        Self {
            server: ServerConfig {
                host: raw.host,
                port: raw.port,
            },
            database: DatabaseConfig {
                url,
                max_connections: raw.db_max_connections,
                min_connections: raw.db_min_connections,
            },
            jwt: TokenConfig {
                secret: raw.jwt_secret,
                expire_hours: raw.jwt_expire_hours,
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let raw = config.try_deserialize::<RawSettings>()?;
        if !EXPIRE_HOURS_RANGE.contains(&raw.jwt_expire_hours) {
            return Err(config::ConfigError::Message(format!(
                "JWT_EXPIRE_HOURS must be between {} and {}, got {}",
                EXPIRE_HOURS_RANGE.start(),
                EXPIRE_HOURS_RANGE.end(),
                raw.jwt_expire_hours
            )));
        }

        Ok(Self::from(raw))
    }

    /// Returns the `host:port` pair to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
