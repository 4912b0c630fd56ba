//! Persisted row wrapper.
//!
//! Records are plain data; the identifier assigned by the storage layer lives
//! beside the record in [`Stored`] rather than inside it, so a record can be
//! built before it has ever been written.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

/// A record type that the storage layer can persist.
pub trait Entity: Clone {
    /// Row identifier assigned by the repository.
    type Id: Copy + Eq + Ord + Hash + Debug + Display + From<i64>;

    /// Entity name used in error contexts and log lines.
    const NAME: &'static str;
}

/// A record together with the identifier it was stored under.
///
/// Dereferences to the record, so derived properties of the record type are
/// available directly on the stored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize, T::Id: Serialize",
    deserialize = "T: Deserialize<'de>, T::Id: Deserialize<'de>"
))]
pub struct Stored<T: Entity> {
    pub id: T::Id,
    #[serde(flatten)]
    pub record: T,
}

impl<T: Entity> Stored<T> {
    pub fn new(id: T::Id, record: T) -> Self {
        Self { id, record }
    }

    /// Drop the identifier and return the bare record.
    pub fn into_record(self) -> T {
        self.record
    }
}

impl<T: Entity> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

impl<T: Entity> DerefMut for Stored<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.record
    }
}
