//! Storage layer for logbook data.
//!
//! This module provides abstractions for storage operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (report CLI, JSON import)            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (crate::services) - Business Logic       │
//! │  - Equipment combination rules                          │
//! │  - Report aggregation                                   │
//! │  - Accounts                                             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!          ┌──────────▼──────────────┐
//!          │  Local Repository       │
//!          │  (in-memory)            │
//!          └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```
//! use astrolog::db::{create_repository, LogbookConfig};
//! use astrolog::services;
//!
//! let repo = create_repository(&LogbookConfig::default()).unwrap();
//! let report = services::get_yearly_report(repo.as_ref(), 2013).unwrap();
//! assert!(report.is_none());
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable exactly one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

use std::sync::Arc;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::LogbookConfig;
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
pub use repository::{
    AccountRepository, CatalogRepository, EquipmentRepository, ErrorContext, FullRepository,
    LogbookRepository, RepositoryError, RepositoryResult,
};

/// Create the repository selected by `config`.
pub fn create_repository(config: &LogbookConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
    RepositoryFactory::from_config(config)
}
