//! Logbook import.
//!
//! Loaders read a JSON logbook export and write it into any repository,
//! resolving equipment and locations by their export keys and objects by
//! name.
//!
//! # Example
//!
//! ```no_run
//! use astrolog::db::repositories::LocalRepository;
//! use astrolog::io::LogbookLoader;
//! use std::path::Path;
//!
//! let repo = LocalRepository::new();
//! let summary = LogbookLoader::import_file(&repo, Path::new("logbook.json"))
//!     .expect("Failed to import");
//! println!("Imported {} observations", summary.observations_created);
//! ```

pub mod loaders;


pub use loaders::{ImportSummary, LogbookExport, LogbookLoader};
