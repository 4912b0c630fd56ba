//! Logbook records.
//!
//! - [`equipment`]: telescopes, eyepieces, barlows, cameras, filters, binoculars
//! - [`catalog`]: sky objects, alternate names, structures and kinds
//! - [`logbook`]: locations, conditions, sessions, observations and images
//! - [`account`]: user accounts
//!
//! Every record implements [`Entity`] and is handed back by the repository
//! wrapped in [`Stored`] together with its identifier.

pub mod account;
pub mod catalog;
pub mod equipment;
pub mod logbook;
pub mod macros;
pub mod stored;

pub use account::{User, UserId};
pub use catalog::{AltName, AltNameId, Kind, KindId, Object, ObjectId, Structure, StructureId};
pub use equipment::{
    Barlow, BarlowId, Binocular, BinocularId, Camera, CameraId, EyePiece, EyePieceId, Filter,
    FilterId, FrontFilter, FrontFilterId, Telescope, TelescopeId,
};
pub use logbook::{
    Condition, ConditionId, EquipmentFamily, Image, ImageId, Location, LocationId, Observation,
    ObservationId, ObservationKey, Session, SessionId,
};
pub use stored::{Entity, Stored};
