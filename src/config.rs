//! Resolves where the application keeps its files. Everything lives under a
//! dot-folder in the user's home unless `LIBRARY_MANAGER_DB` points the
//! database somewhere else.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.sqlite";
/// Log file written next to the database.
const LOG_FILE_NAME: &str = "library-manager.log";
/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "LIBRARY_MANAGER_DB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Build the configuration from the environment and the home directory.
    pub fn from_env() -> Result<Self> {
        let override_path = env::var_os(DB_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let db_path = match override_path {
            Some(path) => path,
            None => default_db_path()?,
        };

        Ok(Self::for_db_path(db_path))
    }

    /// Derive the rest of the layout from a database path.
    pub fn for_db_path(db_path: PathBuf) -> Self {
        let log_path = db_path
            .parent()
            .map(|dir| dir.join(LOG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME));
        Self { db_path, log_path }
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
