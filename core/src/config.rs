//! Connection parameters for the PostgreSQL backend.
//!
//! # Environment Variables
//!
//! - `TODO_DB_HOST` (default: `localhost`)
//! - `TODO_DB_PORT` (default: `5432`)
//! - `TODO_DB_USER` (default: `postgres`)
//! - `TODO_DB_PASSWORD` (default: `postgres`)
//! - `TODO_DB_NAME` (default: `todo`)

use std::fmt;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} has an unsupported value {value:?} (expected one of: {expected})")]
    InvalidChoice {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Where and as whom to connect.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            dbname: "todo".to_string(),
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}

impl DbConfig {
    /// Read overrides from the process environment, falling back to
    /// [`DbConfig::default`] for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`DbConfig::from_env`], with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("TODO_DB_HOST") {
            config.host = host;
        }
        if let Some(value) = lookup("TODO_DB_PORT") {
            config.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                name: "TODO_DB_PORT",
                value,
            })?;
        }
        if let Some(user) = lookup("TODO_DB_USER") {
            config.user = user;
        }
        if let Some(password) = lookup("TODO_DB_PASSWORD") {
            config.password = password;
        }
        if let Some(dbname) = lookup("TODO_DB_NAME") {
            config.dbname = dbname;
        }
        Ok(config)
    }

    /// libpq-style key/value connection string. Contains the password.
    pub fn dsn(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode=disable",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }

    /// The same parameters as [`DbConfig::dsn`], in the form sqlx connects with.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
            .ssl_mode(PgSslMode::Disable)
    }
}
