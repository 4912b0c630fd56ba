//! Equipment records: telescopes, their accessories, cameras, filters and binoculars.
//!
//! These are inert data holders. The only behaviour here is the focal ratio of
//! a telescope; attaching accessories and the figures derived from them live in
//! [`crate::optics`].

use qtty::angular::Degrees;
use qtty::length::Millimeters;
use serde::{Deserialize, Serialize};

use crate::optics::Configuration;

crate::define_id_type!(
    /// Telescope row identifier.
    TelescopeId
);
crate::define_id_type!(
    /// Eyepiece row identifier.
    EyePieceId
);
crate::define_id_type!(
    /// Barlow row identifier.
    BarlowId
);
crate::define_id_type!(
    /// Camera row identifier.
    CameraId
);
crate::define_id_type!(
    /// Front (aperture) filter row identifier.
    FrontFilterId
);
crate::define_id_type!(
    /// Optical (eyepiece) filter row identifier.
    FilterId
);
crate::define_id_type!(
    /// Binocular row identifier.
    BinocularId
);

/// A telescope optical tube.
///
/// The accessory configuration is transient: it is never persisted and every
/// telescope starts out with nothing attached, including one freshly read
/// back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telescope {
    pub name: String,
    pub aperture: Millimeters,
    pub focal_length: Millimeters,
    #[serde(skip)]
    pub(crate) configuration: Configuration,
}

impl Telescope {
    pub fn new(name: impl Into<String>, aperture_mm: f64, focal_length_mm: f64) -> Self {
        Self {
            name: name.into(),
            aperture: Millimeters::new(aperture_mm),
            focal_length: Millimeters::new(focal_length_mm),
            configuration: Configuration::default(),
        }
    }

    /// Focal length divided by aperture.
    ///
    /// Aperture must be positive; the repository refuses to store a telescope
    /// that violates this.
    pub fn f_ratio(&self) -> f64 {
        self.focal_length.value() / self.aperture.value()
    }
}

/// An eyepiece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyePiece {
    /// Optical design label, e.g. "Plössl".
    #[serde(rename = "type")]
    pub kind: String,
    pub focal_length: Millimeters,
    /// Barrel width in inches (1.25, 2).
    pub width: f64,
    /// Apparent field of view, when known.
    #[serde(default)]
    pub apparent_fov: Option<Degrees>,
}

impl EyePiece {
    pub fn new(kind: impl Into<String>, focal_length_mm: f64, width: f64) -> Self {
        Self {
            kind: kind.into(),
            focal_length: Millimeters::new(focal_length_mm),
            width,
            apparent_fov: None,
        }
    }

    pub fn with_apparent_fov(mut self, degrees: f64) -> Self {
        self.apparent_fov = Some(Degrees::new(degrees));
        self
    }
}

/// A barlow lens. The multiplier is an integer greater than one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barlow {
    pub name: String,
    pub multiplier: u32,
}

impl Barlow {
    pub fn new(name: impl Into<String>, multiplier: u32) -> Self {
        Self {
            name: name.into(),
            multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub manufacturer: String,
    pub model: String,
    pub megapixels: f64,
}

impl Camera {
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>, megapixels: f64) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
            megapixels,
        }
    }
}

/// Filter mounted in front of the telescope aperture (e.g. a solar film).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontFilter {
    pub name: String,
}

impl FrontFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Filter threaded onto an eyepiece (e.g. a moon filter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
}

impl Filter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Binoculars have a fixed magnification and take no accessories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binocular {
    pub name: String,
    pub aperture: Millimeters,
    pub magnification: u32,
}

impl Binocular {
    pub fn new(name: impl Into<String>, aperture_mm: f64, magnification: u32) -> Self {
        Self {
            name: name.into(),
            aperture: Millimeters::new(aperture_mm),
            magnification,
        }
    }
}

crate::impl_entity!(Telescope, TelescopeId, "telescope");
crate::impl_entity!(EyePiece, EyePieceId, "eyepiece");
crate::impl_entity!(Barlow, BarlowId, "barlow");
crate::impl_entity!(Camera, CameraId, "camera");
crate::impl_entity!(FrontFilter, FrontFilterId, "front_filter");
crate::impl_entity!(Filter, FilterId, "filter");
crate::impl_entity!(Binocular, BinocularId, "binocular");
