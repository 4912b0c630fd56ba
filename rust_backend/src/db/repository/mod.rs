//! Repository trait definitions: the storage seam of the logbook.
//!
//! Responsibilities are split across focused traits so implementations and
//! callers can depend on only what they use.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`equipment`]: Telescopes, accessories, cameras, filters and binoculars
//! - [`catalog`]: Objects, alternate names, structures and kinds
//! - [`logbook`]: Locations, sessions, conditions, images and observations
//! - [`account`]: User accounts
//!
//! All operations are synchronous. Implementations must be `Send + Sync` and
//! must make every write all-or-nothing.
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use [`FullRepository`]:
//!
//! ```ignore
//! fn log_sighting<R: FullRepository + ?Sized>(repo: &R, obs: Observation) -> RepositoryResult<()> {
//!     let (observation, _created) = repo.record_observation(obs)?;
//!     let object = repo.get_object(observation.object)?;
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod catalog;
pub mod equipment;
pub mod error;
pub mod logbook;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use account::AccountRepository;
pub use catalog::CatalogRepository;
pub use equipment::EquipmentRepository;
pub use logbook::LogbookRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all four
/// repository traits.
pub trait FullRepository:
    EquipmentRepository + CatalogRepository + LogbookRepository + AccountRepository
{
}

// Blanket implementation: any type implementing all four traits automatically implements FullRepository
impl<T> FullRepository for T where
    T: EquipmentRepository + CatalogRepository + LogbookRepository + AccountRepository
{
}
