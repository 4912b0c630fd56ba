//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

use log::info;

use super::repo_config::LogbookConfig;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
#[cfg(feature = "local-repo")]
use super::repositories::LocalRepository;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = RepositoryError;

    /// Parse repository type from string ("local", also accepted as "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            _ => Err(RepositoryError::configuration(format!(
                "Unknown repository type: {}",
                s
            ))),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use astrolog::db::{CatalogRepository, LogbookConfig, LogbookRepository};
/// use astrolog::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local).unwrap();
/// assert!(repo.health_check().unwrap());
///
/// let repo = RepositoryFactory::from_config(&LogbookConfig::default()).unwrap();
/// assert!(repo.list_objects().unwrap().is_empty());
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a repository from a loaded configuration.
    pub fn from_config(config: &LogbookConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type()?;
        info!("Creating {:?} repository", repo_type);
        Self::create(repo_type)
    }

    /// Create an in-memory repository.
    #[cfg(feature = "local-repo")]
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }
}
