//! Configuration: built-in defaults, an optional YAML file, then CLI/env overrides.
//!
//! ```yaml
//! backend: mongodb
//! mongodb:
//!   host: localhost
//!   port: 27017
//!   database: drycleaning
//!   server_selection_timeout_secs: 5
//! sqlite:
//!   path: /var/lib/drycleaning/drycleaning.sqlite
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DryCleaningError, Result};

/// Directory name used under the platform config and data directories.
const APP_DIR: &str = "drycleaning";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.yml";

/// SQLite database file name inside the data directory.
const SQLITE_FILE: &str = "drycleaning.sqlite";

/// Which document store to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Backend {
    /// A MongoDB server.
    #[default]
    Mongodb,
    /// A local SQLite file.
    Sqlite,
}

/// MongoDB connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database holding the six collections.
    pub database: String,
    /// How long to wait for a reachable server.
    pub server_selection_timeout_secs: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            database: "drycleaning".to_string(),
            server_selection_timeout_secs: 5,
        }
    }
}

/// SQLite store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file; the platform data directory when unset.
    pub path: Option<PathBuf>,
}

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store to open.
    pub backend: Backend,
    /// MongoDB settings.
    pub mongodb: MongoConfig,
    /// SQLite settings.
    pub sqlite: SqliteConfig,
}

/// Values given on the command line or in the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Store to open.
    pub backend: Option<Backend>,
    /// MongoDB host.
    pub host: Option<String>,
    /// MongoDB port.
    pub port: Option<u16>,
    /// MongoDB database name.
    pub database: Option<String>,
    /// SQLite file.
    pub sqlite_path: Option<PathBuf>,
}

/// Default config file location (`~/.config/drycleaning/config.yml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Default SQLite database location (`~/.local/share/drycleaning/...` on Linux).
pub fn default_sqlite_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(SQLITE_FILE))
}

impl Config {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            DryCleaningError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    /// Load `explicit` if given, else the default file when it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Apply command-line and environment values on top of the file.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(host) = overrides.host {
            self.mongodb.host = host;
        }
        if let Some(port) = overrides.port {
            self.mongodb.port = port;
        }
        if let Some(database) = overrides.database {
            self.mongodb.database = database;
        }
        if let Some(path) = overrides.sqlite_path {
            self.sqlite.path = Some(path);
        }
        self
    }

    /// SQLite file to open, falling back to the platform data directory.
    pub fn sqlite_path(&self) -> Result<PathBuf> {
        self.sqlite
            .path
            .clone()
            .or_else(default_sqlite_path)
            .ok_or_else(|| {
                DryCleaningError::Config(
                    "no data directory on this platform; set sqlite.path".to_string(),
                )
            })
    }
}
