//! Sky object catalogue: objects, alternate names, structures and kinds.

use super::error::RepositoryResult;
use crate::models::{
    AltName, Kind, KindId, Object, ObjectId, Stored, Structure, StructureId,
};

/// Repository trait for the object catalogue.
pub trait CatalogRepository: Send + Sync {
    // ==================== Objects ====================

    /// Store a new object.
    ///
    /// # Returns
    /// * `Ok(Stored<Object>)` - The object with its assigned ID
    /// * `Err(RepositoryError::ConstraintViolation)` - If the referenced
    ///   structure or kind does not exist
    fn store_object(&self, object: Object) -> RepositoryResult<Stored<Object>>;

    fn get_object(&self, id: ObjectId) -> RepositoryResult<Stored<Object>>;

    /// Find an object by its primary name.
    ///
    /// # Returns
    /// * `Ok(Some(..))` - The first object stored under that name
    /// * `Ok(None)` - If no object has that name
    fn find_object_by_name(&self, name: &str) -> RepositoryResult<Option<Stored<Object>>>;

    fn list_objects(&self) -> RepositoryResult<Vec<Stored<Object>>>;

    /// Save changes to an existing object.
    fn update_object(&self, object: &Stored<Object>) -> RepositoryResult<()>;

    /// Objects currently flagged `to_be_watched`.
    fn watch_list(&self) -> RepositoryResult<Vec<Stored<Object>>>;

    // ==================== Alternate Names ====================

    /// Bind an alternate name to an object.
    ///
    /// Alternate names are unique across all objects; a taken name fails with
    /// `RepositoryError::ConstraintViolation`.
    fn add_alt_name(&self, object: ObjectId, name: &str) -> RepositoryResult<Stored<AltName>>;

    fn alt_names_of(&self, object: ObjectId) -> RepositoryResult<Vec<Stored<AltName>>>;

    // ==================== Structures ====================

    fn store_structure(&self, structure: Structure) -> RepositoryResult<Stored<Structure>>;
    fn get_structure(&self, id: StructureId) -> RepositoryResult<Stored<Structure>>;
    fn objects_in_structure(&self, id: StructureId) -> RepositoryResult<Vec<Stored<Object>>>;

    // ==================== Kinds ====================

    /// Look up a kind by name, creating it when absent.
    ///
    /// # Returns
    /// `(kind, created)` where `created` is true only if a new row was inserted.
    fn get_or_create_kind(&self, name: &str) -> RepositoryResult<(Stored<Kind>, bool)>;

    fn get_kind(&self, id: KindId) -> RepositoryResult<Stored<Kind>>;
    fn list_kinds(&self) -> RepositoryResult<Vec<Stored<Kind>>>;
}
