//! Configuration management

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_BUS_CAPACITY, DEFAULT_NOTIFY_CHANNEL, DEFAULT_RECONNECT_DELAY_SECS};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub realtime: RealtimeSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RealtimeSettings {
    /// Postgres NOTIFY channel carrying inserted message rows
    pub channel: String,
    pub bus_capacity: usize,
    pub reconnect_delay_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory
    pub directory: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .set_override("app.env", env.clone())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CHAT").separator("__").try_parsing(true))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration made only of built-in defaults (in-memory storage)
    pub fn from_defaults() -> Result<Self, AppError> {
        let config: AppConfig = Self::defaults()?.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "chat-server")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 3)?
            .set_default("storage.backend", "memory")?
            .set_default("realtime.channel", DEFAULT_NOTIFY_CHANNEL)?
            .set_default("realtime.bus_capacity", DEFAULT_BUS_CAPACITY as i64)?
            .set_default("realtime.reconnect_delay_secs", DEFAULT_RECONNECT_DELAY_SECS as i64)?
            .set_default("logging.format", "json")
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.storage.backend == StorageBackend::Postgres {
            if self.database.url.trim().is_empty() {
                return Err(AppError::InvalidConfig(
                    "database.url is required for the postgres backend".to_string(),
                ));
            }
            if self.database.max_connections == 0 {
                return Err(AppError::InvalidConfig(
                    "database.max_connections must be greater than zero".to_string(),
                ));
            }
            if self.realtime.channel.trim().is_empty() {
                return Err(AppError::InvalidConfig(
                    "realtime.channel must not be empty".to_string(),
                ));
            }
        }
        if self.realtime.bus_capacity == 0 {
            return Err(AppError::InvalidConfig(
                "realtime.bus_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
