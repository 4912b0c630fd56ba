//! Equipment registration and lookup.
//!
//! Equipment rows are created once and never updated or deleted.

use super::error::RepositoryResult;
use crate::models::{
    Barlow, BarlowId, Binocular, BinocularId, Camera, CameraId, EyePiece, EyePieceId, Filter,
    FilterId, FrontFilter, FrontFilterId, Stored, Telescope, TelescopeId,
};

/// Repository trait for equipment.
///
/// `store_*` validates the physical sanity of a record (positive aperture and
/// focal lengths, barlow multiplier above one) and fails with
/// `RepositoryError::ConstraintViolation` otherwise. `get_*` fails with
/// `RepositoryError::NotFound` for an unknown identifier.
pub trait EquipmentRepository: Send + Sync {
    // ==================== Telescopes ====================

    /// Store a telescope. Any attached accessories are dropped; the stored
    /// row has an empty configuration.
    fn store_telescope(&self, telescope: Telescope) -> RepositoryResult<Stored<Telescope>>;

    /// Retrieve a telescope by ID.
    ///
    /// Every call returns a fresh instance with nothing attached, so accessory
    /// state is never shared between callers.
    fn get_telescope(&self, id: TelescopeId) -> RepositoryResult<Stored<Telescope>>;

    fn list_telescopes(&self) -> RepositoryResult<Vec<Stored<Telescope>>>;

    // ==================== Eyepieces & Barlows ====================

    fn store_eyepiece(&self, eyepiece: EyePiece) -> RepositoryResult<Stored<EyePiece>>;
    fn get_eyepiece(&self, id: EyePieceId) -> RepositoryResult<Stored<EyePiece>>;
    fn list_eyepieces(&self) -> RepositoryResult<Vec<Stored<EyePiece>>>;

    fn store_barlow(&self, barlow: Barlow) -> RepositoryResult<Stored<Barlow>>;
    fn get_barlow(&self, id: BarlowId) -> RepositoryResult<Stored<Barlow>>;
    fn list_barlows(&self) -> RepositoryResult<Vec<Stored<Barlow>>>;

    // ==================== Cameras ====================

    fn store_camera(&self, camera: Camera) -> RepositoryResult<Stored<Camera>>;
    fn get_camera(&self, id: CameraId) -> RepositoryResult<Stored<Camera>>;
    fn list_cameras(&self) -> RepositoryResult<Vec<Stored<Camera>>>;

    // ==================== Filters ====================

    fn store_front_filter(&self, filter: FrontFilter) -> RepositoryResult<Stored<FrontFilter>>;
    fn get_front_filter(&self, id: FrontFilterId) -> RepositoryResult<Stored<FrontFilter>>;
    fn list_front_filters(&self) -> RepositoryResult<Vec<Stored<FrontFilter>>>;

    fn store_filter(&self, filter: Filter) -> RepositoryResult<Stored<Filter>>;
    fn get_filter(&self, id: FilterId) -> RepositoryResult<Stored<Filter>>;
    fn list_filters(&self) -> RepositoryResult<Vec<Stored<Filter>>>;

    // ==================== Binoculars ====================

    fn store_binocular(&self, binocular: Binocular) -> RepositoryResult<Stored<Binocular>>;
    fn get_binocular(&self, id: BinocularId) -> RepositoryResult<Stored<Binocular>>;
    fn list_binoculars(&self) -> RepositoryResult<Vec<Stored<Binocular>>>;
}
