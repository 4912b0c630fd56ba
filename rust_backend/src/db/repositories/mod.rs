//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing, local development
//!   and one-shot report runs over an imported logbook

#[cfg(feature = "local-repo")]
pub mod local;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
