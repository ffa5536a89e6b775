//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Backend, ConfigOverrides};

/// Dry-cleaning console - browse and edit the shop's document collections.
#[derive(Parser, Debug)]
#[command(name = "drycleaning")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML config file (default: the platform config directory).
    #[arg(short, long, env = "DRYCLEANING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Document store to use.
    #[arg(long, value_enum, env = "DRYCLEANING_BACKEND")]
    pub backend: Option<Backend>,

    /// MongoDB host.
    #[arg(long, env = "DRYCLEANING_MONGODB_HOST")]
    pub host: Option<String>,

    /// MongoDB port.
    #[arg(long, env = "DRYCLEANING_MONGODB_PORT")]
    pub port: Option<u16>,

    /// MongoDB database name.
    #[arg(long, env = "DRYCLEANING_MONGODB_DATABASE")]
    pub database: Option<String>,

    /// SQLite database file for the sqlite backend.
    #[arg(long, env = "DRYCLEANING_SQLITE_PATH")]
    pub sqlite_path: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Settings given on the command line or in the environment.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend,
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            sqlite_path: self.sqlite_path.clone(),
        }
    }
}
