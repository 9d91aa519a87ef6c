//! Application configuration
//!
//! Loaded from a TOML file; every field has a default so an empty or absent
//! file is valid. Environment variables override file values.

use crate::error::Result;
use crate::store::{PersistPolicy, PersistedField, DEFAULT_NAMESPACE};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "BLOOMWELL_CONFIG";
pub const DB_ENV: &str = "BLOOMWELL_DB";
pub const BIND_ENV: &str = "BLOOMWELL_BIND";
pub const LOG_ENV: &str = "BLOOMWELL_LOG";

const DEFAULT_CONFIG_FILE: &str = "bloomwell.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the persisted selection
    pub database_path: PathBuf,
    /// Key-value slot name for the selection
    pub storage_namespace: String,
    /// Store fields written to durable storage
    pub persisted_fields: Vec<PersistedField>,
    /// Address the API server listens on
    pub bind_addr: String,
    pub log_level: String,
    /// Directory with products.csv / clients.csv / shipments.csv
    pub seed_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("bloomwell.db"),
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            persisted_fields: PersistPolicy::default().fields,
            bind_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            seed_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(value)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let value = std::fs::read_to_string(path)?;
        Self::from_toml(&value)
    }

    /// Resolve the config file and apply environment overrides.
    ///
    /// Lookup order: explicit path, `$BLOOMWELL_CONFIG`, `./bloomwell.toml`
    /// when present, built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            });

        let mut config = match &path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());

        if let Some(path) = &path {
            info!("event=config_load path={}", path.display());
        }
        Ok(config)
    }

    /// Override fields from a variable lookup (injected for tests)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(DB_ENV) {
            self.database_path = PathBuf::from(db);
        }
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind_addr = bind;
        }
        if let Some(level) = lookup(LOG_ENV) {
            self.log_level = level;
        }
    }

    pub fn persist_policy(&self) -> PersistPolicy {
        PersistPolicy::new(self.persisted_fields.clone())
    }
}
