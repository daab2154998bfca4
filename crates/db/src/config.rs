//! Database connection settings, read once at startup from the environment.

use std::fmt;

use sqlx::mysql::MySqlConnectOptions;
use thiserror::Error;

pub const ENV_USERNAME: &str = "DATABASE_USERNAME";
pub const ENV_PASSWORD: &str = "DATABASE_PASSWORD";
pub const ENV_NAME: &str = "DATABASE_NAME";
pub const ENV_SERVER: &str = "DATABASE_SERVER";
pub const ENV_PORT: &str = "DATABASE_PORT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("DATABASE_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
}

/// Credentials and location of the MySQL server.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    pub name: String,
    pub server: String,
    pub port: u16,
}

impl DatabaseConfig {
    /// Read the `DATABASE_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// The password may be empty; every other variable must be present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let port_raw = require(ENV_PORT)?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        Ok(Self {
            username: require(ENV_USERNAME)?,
            password: lookup(ENV_PASSWORD).unwrap_or_default(),
            name: require(ENV_NAME)?,
            server: require(ENV_SERVER)?,
            port,
        })
    }

    /// MySQL connect options for this config.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.server)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.name)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("server", &self.server)
            .field("port", &self.port)
            .finish()
    }
}
