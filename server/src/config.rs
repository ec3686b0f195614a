//! Process configuration, read once at startup.
//!
//! # Environment Variables
//!
//! - `HOST`: bind address (default: `0.0.0.0`)
//! - `PORT`: bind port (default: `8080`)
//! - `TODO_STORAGE`: `postgres` (default) | `memory`
//! - `TODO_STATUS_CODES`: `always-ok` (default) | `typed`
//! - `TODO_DB_*`: database connection, see [`todo_core::config`]

use std::str::FromStr;

use todo_core::{ConfigError, DbConfig};

/// Backing storage for the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Postgres,
    /// Process-local; contents are lost on restart.
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "in_memory" | "inmemory" => Ok(Self::InMemory),
            _ => Err(ConfigError::InvalidChoice {
                name: "TODO_STORAGE",
                value: value.to_string(),
                expected: "postgres, memory",
            }),
        }
    }
}

/// How failures are reflected in the HTTP status line. The body text is the
/// same under both policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Every response is `200 OK`; errors are reported in the body only.
    #[default]
    AlwaysOk,
    /// 400 for rejected input, 404 for unknown ids, 500 for storage failures.
    Typed,
}

impl FromStr for StatusPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "always-ok" | "always_ok" | "ok" => Ok(Self::AlwaysOk),
            "typed" => Ok(Self::Typed),
            _ => Err(ConfigError::InvalidChoice {
                name: "TODO_STATUS_CODES",
                value: value.to_string(),
                expected: "always-ok, typed",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageMode,
    pub status_policy: StatusPolicy,
    pub db: DbConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            storage: StorageMode::default(),
            status_policy: StatusPolicy::default(),
            db: DbConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            db: DbConfig::from_lookup(&lookup)?,
            ..Self::default()
        };
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(value) = lookup("PORT") {
            config.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { name: "PORT", value })?;
        }
        if let Some(value) = lookup("TODO_STORAGE") {
            config.storage = value.parse()?;
        }
        if let Some(value) = lookup("TODO_STATUS_CODES") {
            config.status_policy = value.parse()?;
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
