//! Server configuration.
//!
//! Loading order, later sources winning:
//! 1. Compiled [`Config::default()`]
//! 2. `todo-api.toml` in the working directory, or the file named by
//!    `TODO_API_CONFIG`, when it exists
//! 3. `TODO_API_*` environment variables (e.g. `TODO_API_PORT=8080`)

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "TODO_API_";
pub const CONFIG_PATH_VAR: &str = "TODO_API_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "todo-api.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Figment(#[from] figment::Error),
}

/// Configuration for the todo API server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `3000`).
    pub port: u16,
    /// sqlx connection string for the item database.
    pub database_url: String,
    /// Upper bound on pooled database connections.
    pub max_connections: u32,
    /// The single browser origin allowed by the CORS policy.
    pub cors_origin: String,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            database_url: "sqlite://todo.db?mode=rwc".into(),
            max_connections: 5,
            cors_origin: "https://new-employee-todoapp.azurewebsites.net".into(),
            log_level: "info".into(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load from the default file location plus the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::figment(path).extract().map_err(ConfigError::from)
    }

    /// The layered provider stack. A missing file contributes nothing.
    pub fn figment(path: impl Into<PathBuf>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.into()))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
