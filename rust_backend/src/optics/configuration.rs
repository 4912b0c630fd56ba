use log::debug;
use qtty::angular::Degrees;

use crate::models::{Barlow, Camera, EyePiece, FrontFilter, Telescope};

/// What sits in the focuser.
///
/// The eyepiece path and the camera path are mutually exclusive; a barlow only
/// exists inside the eyepiece path.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OpticalPath {
    #[default]
    Empty,
    WithEyepiece {
        eyepiece: EyePiece,
        barlow: Option<Barlow>,
    },
    WithCamera {
        camera: Camera,
    },
}

/// Per-instance accessory state of a telescope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    path: OpticalPath,
    front_filter: Option<FrontFilter>,
}

impl Configuration {
    pub fn path(&self) -> &OpticalPath {
        &self.path
    }

    pub fn front_filter(&self) -> Option<&FrontFilter> {
        self.front_filter.as_ref()
    }
}

impl Telescope {
    /// Put `eyepiece` in the focuser, replacing any camera.
    ///
    /// A barlow already in the eyepiece path stays in place.
    pub fn attach_eyepiece(&mut self, eyepiece: EyePiece) {
        let barlow = match std::mem::take(&mut self.configuration.path) {
            OpticalPath::WithEyepiece { barlow, .. } => barlow,
            OpticalPath::Empty | OpticalPath::WithCamera { .. } => None,
        };
        self.configuration.path = OpticalPath::WithEyepiece { eyepiece, barlow };
    }

    /// Insert `barlow` in front of the attached eyepiece.
    ///
    /// Without an eyepiece there is nothing to multiply and the call leaves
    /// the configuration unchanged.
    pub fn attach_barlow(&mut self, barlow: Barlow) {
        match &mut self.configuration.path {
            OpticalPath::WithEyepiece { barlow: slot, .. } => *slot = Some(barlow),
            OpticalPath::Empty | OpticalPath::WithCamera { .. } => {
                debug!(
                    "Ignoring barlow '{}' on telescope '{}': no eyepiece attached",
                    barlow.name, self.name
                );
            }
        }
    }

    /// Put `camera` in the focuser, removing any eyepiece and barlow.
    pub fn attach_camera(&mut self, camera: Camera) {
        self.configuration.path = OpticalPath::WithCamera { camera };
    }

    pub fn attach_front_filter(&mut self, front_filter: FrontFilter) {
        self.configuration.front_filter = Some(front_filter);
    }

    /// Remove every accessory, front filter included.
    pub fn detach_all(&mut self) {
        self.configuration = Configuration::default();
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn eyepiece(&self) -> Option<&EyePiece> {
        match &self.configuration.path {
            OpticalPath::WithEyepiece { eyepiece, .. } => Some(eyepiece),
            _ => None,
        }
    }

    pub fn barlow(&self) -> Option<&Barlow> {
        match &self.configuration.path {
            OpticalPath::WithEyepiece { barlow, .. } => barlow.as_ref(),
            _ => None,
        }
    }

    pub fn camera(&self) -> Option<&Camera> {
        match &self.configuration.path {
            OpticalPath::WithCamera { camera } => Some(camera),
            _ => None,
        }
    }

    pub fn front_filter(&self) -> Option<&FrontFilter> {
        self.configuration.front_filter()
    }

    /// Magnification through the attached eyepiece and barlow.
    ///
    /// `floor(focal_length / eyepiece_focal_length * barlow_multiplier)`; the
    /// product is truncated, not rounded. `None` with a camera or with an
    /// empty focuser.
    pub fn magnification(&self) -> Option<u32> {
        match &self.configuration.path {
            OpticalPath::WithEyepiece { eyepiece, barlow } => {
                let multiplier = barlow.as_ref().map_or(1, |b| b.multiplier);
                // Multiply first: an integral product must not floor to one below.
                let power = self.focal_length.value() * f64::from(multiplier)
                    / eyepiece.focal_length.value();
                Some(power.floor() as u32)
            }
            OpticalPath::Empty | OpticalPath::WithCamera { .. } => None,
        }
    }

    /// True field of view, rounded to two decimals.
    ///
    /// Apparent field divided by the eyepiece power alone; an attached barlow
    /// does not enter this figure. `None` unless an eyepiece with a known
    /// apparent field is attached.
    pub fn field_of_view(&self) -> Option<Degrees> {
        let eyepiece = self.eyepiece()?;
        let apparent = eyepiece.apparent_fov?;
        let power = self.focal_length.value() / eyepiece.focal_length.value();
        let true_field = apparent.value() / power;
        Some(Degrees::new((true_field * 100.0).round() / 100.0))
    }
}
