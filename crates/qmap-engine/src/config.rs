//! TOML configuration
//!
//! Every section is optional; a missing section takes its defaults.

use std::fs;
use std::path::{Path, PathBuf};

use qmap_core::errors::{QmapError, Result};
use qmap_core::logging_facility::Profile;
use qmap_core::{CascadeConfig, PlacementStrategy};
use qmap_store::SqliteStore;
use serde::Deserialize;

/// Application configuration loaded from a TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QmapConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub cascade: CascadeConfig,

    #[serde(default)]
    pub placement: PlacementStrategy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file, created on first use
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".qmap/store.db"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Profile,
}

impl QmapConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// `Config` when the file is missing, unreadable or malformed, or when
    /// a value fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(QmapError::Config {
                reason: format!("config file not found: {}", path.display()),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| QmapError::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` when given, otherwise use defaults
    ///
    /// # Errors
    ///
    /// As for [`QmapConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// `Config` for malformed TOML or invalid values.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: QmapConfig = toml::from_str(content).map_err(|e| QmapError::Config {
            reason: e.to_string(),
        })?;
        config
            .placement
            .validate()
            .map_err(|e| QmapError::Config {
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Open the configured SQLite store, creating its directory if needed
    ///
    /// # Errors
    ///
    /// `Config` if the directory cannot be created; `Persistence` from the
    /// store.
    pub fn open_store(&self) -> Result<SqliteStore> {
        if let Some(parent) = self.store.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| QmapError::Config {
                    reason: format!("cannot create {}: {}", parent.display(), e),
                })?;
            }
        }
        SqliteStore::open(&self.store.path)
    }
}
