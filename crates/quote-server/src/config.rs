//! Server configuration
//!
//! Everything comes from the process environment (optionally seeded from a
//! `.env` file). Keys are matched case-insensitively, e.g. `DB_HOST`.

use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment};
use serde::Deserialize;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_DATABASE_PATH: &str = "quotes.db";
pub const DEFAULT_QUOTABLE_API_URL: &str = "https://api.quotable.io";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Raw settings as they appear in the environment
#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    bind_address: String,
    database_path: String,
    quotable_api_url: String,
    db_max_connections: u32,
    db_host: Option<String>,
    db_port: u16,
    db_user: Option<String>,
    db_password: Option<String>,
    db_name: Option<String>,
}

/// MySQL connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl MySqlSettings {
    /// Connection URL with the password masked, safe for logs
    pub fn redacted_url(&self) -> String {
        format!(
            "mysql://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseBackend {
    MySql(MySqlSettings),
    Sqlite { path: String },
}

impl DatabaseBackend {
    pub fn describe(&self) -> String {
        match self {
            DatabaseBackend::MySql(settings) => settings.redacted_url(),
            DatabaseBackend::Sqlite { path } => format!("sqlite://{}", path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub database: DatabaseBackend,
    pub max_connections: u32,
    pub quotable_api_url: String,
}

impl ServerConfig {
    /// Load from `.env` (if present) and the process environment
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }

        Self::load(Config::builder().add_source(Environment::default()))
    }

    /// Resolve settings from an arbitrary builder, applying defaults
    pub fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let raw: RawSettings = builder
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("quotable_api_url", DEFAULT_QUOTABLE_API_URL)?
            .set_default("db_max_connections", i64::from(DEFAULT_MAX_CONNECTIONS))?
            .set_default("db_port", i64::from(DEFAULT_MYSQL_PORT))?
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        let database = match non_blank(raw.db_host) {
            Some(host) => {
                let Some(user) = non_blank(raw.db_user) else {
                    bail!("DB_USER must be set when DB_HOST is set");
                };
                let Some(database) = non_blank(raw.db_name) else {
                    bail!("DB_NAME must be set when DB_HOST is set");
                };
                DatabaseBackend::MySql(MySqlSettings {
                    host,
                    port: raw.db_port,
                    user,
                    password: raw.db_password.unwrap_or_default(),
                    database,
                })
            }
            None => DatabaseBackend::Sqlite {
                path: raw.database_path,
            },
        };

        Ok(Self {
            bind_address: raw.bind_address,
            database,
            max_connections: raw.db_max_connections,
            quotable_api_url: raw.quotable_api_url.trim_end_matches('/').to_string(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
