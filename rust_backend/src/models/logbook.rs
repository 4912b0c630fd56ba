//! Observing sessions, their locations and conditions, and the observations
//! logged during them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::ObjectId;
use super::equipment::{
    BarlowId, BinocularId, CameraId, EyePieceId, FilterId, FrontFilterId, TelescopeId,
};

crate::define_id_type!(
    /// Location row identifier.
    LocationId
);
crate::define_id_type!(
    /// Condition row identifier.
    ConditionId
);
crate::define_id_type!(
    /// Session row identifier.
    SessionId
);
crate::define_id_type!(
    /// Observation row identifier.
    ObservationId
);
crate::define_id_type!(
    /// Image row identifier.
    ImageId
);

/// An observing site. Coordinates are kept as sexagesimal text ("55:51:38").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
    /// Metres above sea level.
    pub altitude: i32,
    /// Hours from UTC.
    #[serde(default)]
    pub utc_offset: i32,
}

/// Weather at the time of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Degrees Celsius.
    pub temperature: i32,
    /// Relative humidity, 0..=100.
    #[serde(default)]
    pub humidity: Option<i32>,
    #[serde(default)]
    pub seeing: Option<f64>,
}

/// One night of observing at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    pub location: LocationId,
    #[serde(default)]
    pub condition: Option<ConditionId>,
    /// Illuminated fraction of the moon in percent, 0..=100.
    #[serde(default)]
    pub moon_phase: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Session {
    pub fn new(date: NaiveDate, location: LocationId) -> Self {
        Self {
            date,
            location,
            condition: None,
            moon_phase: None,
            note: None,
        }
    }
}

/// Stored picture attached to an observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub filename: String,
}

/// A single logged sighting of an object during a session.
///
/// Equipment references are kept flat, exactly as recorded; the combination
/// rules are enforced when the observation is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub session: SessionId,
    pub object: ObjectId,
    pub binocular: Option<BinocularId>,
    pub telescope: Option<TelescopeId>,
    pub eyepiece: Option<EyePieceId>,
    pub barlow: Option<BarlowId>,
    pub camera: Option<CameraId>,
    pub optic_filter: Option<FilterId>,
    pub front_filter: Option<FrontFilterId>,
    pub note: Option<String>,
    pub image: Option<ImageId>,
}

/// The equipment family an observation was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentFamily {
    NakedEye,
    Binocular(BinocularId),
    Telescope(TelescopeId),
}

/// Every field that identifies an observation for idempotent creation.
///
/// Two creation requests with the same key resolve to the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservationKey {
    pub session: SessionId,
    pub object: ObjectId,
    pub binocular: Option<BinocularId>,
    pub telescope: Option<TelescopeId>,
    pub eyepiece: Option<EyePieceId>,
    pub barlow: Option<BarlowId>,
    pub camera: Option<CameraId>,
    pub optic_filter: Option<FilterId>,
    pub front_filter: Option<FrontFilterId>,
    pub note: Option<String>,
}

impl Observation {
    /// A naked-eye observation with no note.
    pub fn new(session: SessionId, object: ObjectId) -> Self {
        Self {
            session,
            object,
            binocular: None,
            telescope: None,
            eyepiece: None,
            barlow: None,
            camera: None,
            optic_filter: None,
            front_filter: None,
            note: None,
            image: None,
        }
    }

    /// True when neither a telescope nor binoculars were used.
    pub fn naked_eye(&self) -> bool {
        self.telescope.is_none() && self.binocular.is_none()
    }

    pub fn equipment_family(&self) -> EquipmentFamily {
        match (self.binocular, self.telescope) {
            (Some(binocular), _) => EquipmentFamily::Binocular(binocular),
            (None, Some(telescope)) => EquipmentFamily::Telescope(telescope),
            (None, None) => EquipmentFamily::NakedEye,
        }
    }

    pub fn key(&self) -> ObservationKey {
        ObservationKey {
            session: self.session,
            object: self.object,
            binocular: self.binocular,
            telescope: self.telescope,
            eyepiece: self.eyepiece,
            barlow: self.barlow,
            camera: self.camera,
            optic_filter: self.optic_filter,
            front_filter: self.front_filter,
            note: self.note.clone(),
        }
    }
}

crate::impl_entity!(Location, LocationId, "location");
crate::impl_entity!(Condition, ConditionId, "condition");
crate::impl_entity!(Session, SessionId, "session");
crate::impl_entity!(Image, ImageId, "image");
crate::impl_entity!(Observation, ObservationId, "observation");
