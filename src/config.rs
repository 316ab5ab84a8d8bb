//! Settings file loading.
//!
//! The orchestrator is driven by a YAML settings file mapping database names
//! to connection parameters:
//!
//! ```yaml
//! migrations: ./db
//! databases:
//!   main:
//!     type: postgres
//!     host: db.internal
//!     database: app
//!     port: 5432
//!     username: deploy
//!     password: hunter2
//!   sessions:
//!     type: mongodb
//!     host: sessions.internal
//!     database: app
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Connection parameters for one configured database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Backend discriminator, resolved through the provider registry.
    #[serde(rename = "type")]
    pub kind: String,
    pub host: String,
    /// Database name, or the file path for file-backed engines like SQLite.
    pub database: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Top-level settings blob.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Migration directory; defaults to `./db` when absent.
    #[serde(default)]
    pub migrations: Option<PathBuf>,
    pub databases: BTreeMap<String, DatabaseSettings>,
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&raw)?;
        Ok(settings)
    }

    /// The configured migration directory, or the `./db` default.
    pub fn migrations_dir(&self) -> PathBuf {
        self.migrations
            .clone()
            .unwrap_or_else(|| PathBuf::from("./db"))
    }
}
