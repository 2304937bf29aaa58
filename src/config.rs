//! Configuration management for menu-maker.
//!
//! Handles loading configuration from TOML files and environment variables:
//! the SQLite database file, the server identity and transport, and
//! the schema document served as a resource.

use crate::error::{MenuError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the database path.
pub const DATABASE_ENV_VAR: &str = "MENU_MAKER_DB";

const DEFAULT_INSTRUCTIONS: &str = "This server provides data analysis tools. \
Call generate_menu_metrics_summary() to analyze numerical menu data. \
Also provides async_query_to_df() to run SQL queries and return rows as records.";

/// Main configuration structure for menu-maker.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Relational store settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Server identity settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Schema resource settings.
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// SQLite database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Create the file on first connect if it does not exist.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("menu_recommendation.db")
}

fn default_create_if_missing() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            create_if_missing: default_create_if_missing(),
        }
    }
}

impl DatabaseConfig {
    /// Applies `MENU_MAKER_DB` when the path was left at its default.
    pub fn apply_env_defaults(&mut self) {
        if self.path == default_database_path() {
            if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
                if !path.is_empty() {
                    self.path = PathBuf::from(path);
                }
            }
        }
    }
}

/// How `serve` talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC messages POSTed to `/mcp`.
    Http,
}

/// Server identity announced during `initialize`, and where to listen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Free-form usage instructions for the calling agent.
    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// Transport used by `serve`.
    #[serde(default)]
    pub transport: Transport,

    /// Interface the HTTP transport binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP transport binds to.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_server_name() -> String {
    "Menu Maker Helper".to_string()
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            instructions: default_instructions(),
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Returns the HTTP listen address as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Schema resource configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchemaConfig {
    /// File holding the schema document. The built-in document is used when unset.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("menu-maker")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| MenuError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            MenuError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
