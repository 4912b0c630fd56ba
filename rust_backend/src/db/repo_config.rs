//! Logbook configuration file support.
//!
//! This module provides utilities for reading the repository backend and
//! account settings from TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::factory::RepositoryType;
use super::repository::{RepositoryError, RepositoryResult};

/// Environment variable holding an explicit configuration path.
pub const CONFIG_ENV_VAR: &str = "ASTROLOG_CONFIG";

/// Logbook configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogbookConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub accounts: AccountSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: "local".to_string(),
        }
    }
}

/// Account creation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSettings {
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_min_password_length() -> usize {
    8
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl LogbookConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(LogbookConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> RepositoryResult<Self> {
        let config: LogbookConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.repository_type()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `astrolog.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(LogbookConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> RepositoryResult<Self> {
        match Self::default_path() {
            Some(path) => Self::from_file(path),
            None => Err(RepositoryError::configuration(
                "No astrolog.toml found in standard locations",
            )),
        }
    }

    fn default_path() -> Option<PathBuf> {
        [
            PathBuf::from("astrolog.toml"),
            PathBuf::from("rust_backend/astrolog.toml"),
            PathBuf::from("../astrolog.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Resolve configuration for a process.
    ///
    /// Uses the file named by `ASTROLOG_CONFIG` when set, then the default
    /// locations, then built-in defaults. A file that exists but fails to
    /// parse is an error.
    pub fn from_env() -> RepositoryResult<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) => Self::from_file(path),
            None => {
                log::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> RepositoryResult<RepositoryType> {
        self.repository.repo_type.parse()
    }
}
