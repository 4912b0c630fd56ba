//! Observation validation and creation, and the optics derived from a
//! recorded observation.

use log::{debug, info};
use qtty::angular::Degrees;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{
    BarlowId, BinocularId, CameraId, EquipmentFamily, EyePieceId, FilterId, FrontFilterId,
    ImageId, ObjectId, Observation, ObservationId, SessionId, Stored, Telescope, TelescopeId,
};

use super::error::{EquipmentRule, LogbookResult};

/// Equipment and note selected for a new observation.
///
/// The default request is a naked-eye observation without a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationRequest {
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

impl ObservationRequest {
    pub fn naked_eye() -> Self {
        Self::default()
    }

    pub fn binocular(binocular: BinocularId) -> Self {
        Self {
            binocular: Some(binocular),
            ..Self::default()
        }
    }

    /// A telescope with an eyepiece and optional barlow.
    pub fn visual(telescope: TelescopeId, eyepiece: EyePieceId, barlow: Option<BarlowId>) -> Self {
        Self {
            telescope: Some(telescope),
            eyepiece: Some(eyepiece),
            barlow,
            ..Self::default()
        }
    }

    /// A telescope imaging through a camera.
    pub fn imaging(telescope: TelescopeId, camera: CameraId) -> Self {
        Self {
            telescope: Some(telescope),
            camera: Some(camera),
            ..Self::default()
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_filters(
        mut self,
        optic_filter: Option<FilterId>,
        front_filter: Option<FrontFilterId>,
    ) -> Self {
        self.optic_filter = optic_filter;
        self.front_filter = front_filter;
        self
    }

    fn into_observation(self, session: SessionId, object: ObjectId) -> Observation {
        Observation {
            session,
            object,
            binocular: self.binocular,
            telescope: self.telescope,
            eyepiece: self.eyepiece,
            barlow: self.barlow,
            camera: self.camera,
            optic_filter: self.optic_filter,
            front_filter: self.front_filter,
            note: self.note,
            image: self.image,
        }
    }
}

/// Check the equipment combination rules in order; the first violation wins.
pub fn validate_equipment(request: &ObservationRequest) -> Result<(), EquipmentRule> {
    let binocular = request.binocular.is_some();
    if binocular && request.telescope.is_some() {
        return Err(EquipmentRule::TelescopeWithBinoculars);
    }
    if binocular && request.eyepiece.is_some() {
        return Err(EquipmentRule::EyepieceWithBinoculars);
    }
    if binocular && request.optic_filter.is_some() {
        return Err(EquipmentRule::FilterWithBinoculars);
    }
    if request.telescope.is_some() && request.eyepiece.is_none() && request.camera.is_none() {
        return Err(EquipmentRule::TelescopeWithoutOptics);
    }
    Ok(())
}

/// Log an observation of `object` during `session`.
///
/// Validates the equipment combination, then records the observation in a
/// single atomic storage operation that also takes the object off the
/// watch-list. Repeating a request with identical fields returns the existing
/// row with `created = false`.
///
/// # Returns
/// * `Ok((observation, created))`
/// * `Err(LogbookError::InvalidEquipmentCombination)` before any write
/// * `Err(LogbookError::Repository)` for dangling references or storage failures
pub fn create_observation<R: FullRepository + ?Sized>(
    repo: &R,
    session: SessionId,
    object: ObjectId,
    request: ObservationRequest,
) -> LogbookResult<(Stored<Observation>, bool)> {
    info!(
        "Service layer: recording observation of object {} in session {}",
        object, session
    );

    validate_equipment(&request)?;

    let (observation, created) = repo.record_observation(request.into_observation(session, object))?;
    if created {
        debug!("Created observation {}", observation.id);
    } else {
        debug!("Observation {} already recorded", observation.id);
    }
    Ok((observation, created))
}

/// Rebuild the telescope configuration an observation was made with.
///
/// Always starts from a freshly retrieved instance. Returns `None` for
/// observations without a telescope.
pub fn configured_telescope<R: FullRepository + ?Sized>(
    repo: &R,
    observation: &Observation,
) -> RepositoryResult<Option<Telescope>> {
    let Some(telescope_id) = observation.telescope else {
        return Ok(None);
    };

    let mut telescope = repo.get_telescope(telescope_id)?.into_record();
    if let Some(front_filter) = observation.front_filter {
        telescope.attach_front_filter(repo.get_front_filter(front_filter)?.into_record());
    }
    if let Some(eyepiece) = observation.eyepiece {
        telescope.attach_eyepiece(repo.get_eyepiece(eyepiece)?.into_record());
        if let Some(barlow) = observation.barlow {
            telescope.attach_barlow(repo.get_barlow(barlow)?.into_record());
        }
    } else if let Some(camera) = observation.camera {
        telescope.attach_camera(repo.get_camera(camera)?.into_record());
    }
    Ok(Some(telescope))
}

/// Magnification an observation was made at.
///
/// Binoculars report their fixed magnification; telescope observations
/// re-attach the recorded eyepiece and barlow. Naked-eye and camera
/// observations have none.
pub fn observation_magnification<R: FullRepository + ?Sized>(
    repo: &R,
    observation: &Observation,
) -> RepositoryResult<Option<u32>> {
    match observation.equipment_family() {
        EquipmentFamily::NakedEye => Ok(None),
        EquipmentFamily::Binocular(id) => Ok(Some(repo.get_binocular(id)?.magnification)),
        EquipmentFamily::Telescope(_) => {
            Ok(configured_telescope(repo, observation)?.and_then(|t| t.magnification()))
        }
    }
}

/// True field of view through the recorded eyepiece, if known.
pub fn observation_field_of_view<R: FullRepository + ?Sized>(
    repo: &R,
    observation: &Observation,
) -> RepositoryResult<Option<Degrees>> {
    Ok(configured_telescope(repo, observation)?.and_then(|t| t.field_of_view()))
}

/// Replace the note of a stored observation.
///
/// Fails with a constraint violation when the new note would make the
/// observation identical to another one.
pub fn update_observation_note<R: FullRepository + ?Sized>(
    repo: &R,
    id: ObservationId,
    note: Option<String>,
) -> LogbookResult<Stored<Observation>> {
    info!("Service layer: updating note of observation {}", id);

    let mut observation = repo.get_observation(id)?;
    observation.note = note;
    repo.update_observation(&observation)?;
    Ok(observation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::*;
    use crate::models::*;
    use crate::services::LogbookError;
    use chrono::NaiveDate;

    struct Fixture {
        repo: LocalRepository,
        session: SessionId,
        object: ObjectId,
        telescope: TelescopeId,
        eyepiece: EyePieceId,
        barlow: BarlowId,
        camera: CameraId,
        binocular: BinocularId,
    }

    fn fixture() -> Fixture {
        let repo = LocalRepository::new();
        let location = repo
            .store_location(Location {
                name: "Horsens".to_string(),
                country: "Denmark".to_string(),
                latitude: "55:51:38".to_string(),
                longitude: "-9:51:1".to_string(),
                altitude: 0,
                utc_offset: 1,
            })
            .unwrap();
        let session = repo
            .store_session(Session::new(
                NaiveDate::from_ymd_opt(2023, 9, 13).unwrap(),
                location.id,
            ))
            .unwrap();
        let object = repo.store_object(Object::new("Orion Nebula").watched()).unwrap();
        let telescope = repo
            .store_telescope(Telescope::new("Explorer 150P", 150.0, 750.0))
            .unwrap();
        let eyepiece = repo
            .store_eyepiece(EyePiece::new("Plössl", 6.0, 1.25).with_apparent_fov(52.0))
            .unwrap();
        let barlow = repo.store_barlow(Barlow::new("Barlow 2x", 2)).unwrap();
        let camera = repo.store_camera(Camera::new("ZWO", "ASI224MC", 1.2)).unwrap();
        let binocular = repo
            .store_binocular(Binocular::new("Celestron 10x50", 50.0, 10))
            .unwrap();

        Fixture {
            repo,
            session: session.id,
            object: object.id,
            telescope: telescope.id,
            eyepiece: eyepiece.id,
            barlow: barlow.id,
            camera: camera.id,
            binocular: binocular.id,
        }
    }

    #[test]
    fn test_validate_equipment_rule_order() {
        let all = ObservationRequest {
            binocular: Some(BinocularId(1)),
            telescope: Some(TelescopeId(1)),
            eyepiece: Some(EyePieceId(1)),
            optic_filter: Some(FilterId(1)),
            ..Default::default()
        };
        assert_eq!(validate_equipment(&all), Err(EquipmentRule::TelescopeWithBinoculars));

        let request = ObservationRequest {
            telescope: None,
            ..all.clone()
        };
        assert_eq!(validate_equipment(&request), Err(EquipmentRule::EyepieceWithBinoculars));

        let request = ObservationRequest {
            telescope: None,
            eyepiece: None,
            ..all
        };
        assert_eq!(validate_equipment(&request), Err(EquipmentRule::FilterWithBinoculars));

        let request = ObservationRequest {
            telescope: Some(TelescopeId(1)),
            barlow: Some(BarlowId(1)),
            ..Default::default()
        };
        assert_eq!(validate_equipment(&request), Err(EquipmentRule::TelescopeWithoutOptics));
    }

    #[test]
    fn test_validate_equipment_accepts_valid_paths() {
        assert!(validate_equipment(&ObservationRequest::naked_eye()).is_ok());
        assert!(validate_equipment(&ObservationRequest::binocular(BinocularId(1))).is_ok());
        assert!(
            validate_equipment(&ObservationRequest::visual(TelescopeId(1), EyePieceId(1), None))
                .is_ok()
        );
        assert!(validate_equipment(&ObservationRequest::imaging(TelescopeId(1), CameraId(1))).is_ok());

        let front_filter_on_binoculars = ObservationRequest::binocular(BinocularId(1))
            .with_filters(None, Some(FrontFilterId(1)));
        assert!(validate_equipment(&front_filter_on_binoculars).is_ok());
    }

    #[test]
    fn test_invalid_combination_writes_nothing() {
        let f = fixture();
        let before = f.repo.write_count();
        let request = ObservationRequest {
            binocular: Some(f.binocular),
            eyepiece: Some(f.eyepiece),
            ..Default::default()
        };

        let err = create_observation(&f.repo, f.session, f.object, request).unwrap_err();
        assert_eq!(err.equipment_rule(), Some(EquipmentRule::EyepieceWithBinoculars));
        assert_eq!(f.repo.write_count(), before);
        assert!(f.repo.get_object(f.object).unwrap().to_be_watched);
    }

    #[test]
    fn test_create_observation_is_idempotent() {
        let f = fixture();
        let request = ObservationRequest::visual(f.telescope, f.eyepiece, Some(f.barlow))
            .with_note("Wow, what a view tonight!");

        let (first, created) =
            create_observation(&f.repo, f.session, f.object, request.clone()).unwrap();
        assert!(created);
        let writes = f.repo.write_count();

        let (second, created) = create_observation(&f.repo, f.session, f.object, request).unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(f.repo.write_count(), writes);
        assert_eq!(f.repo.observation_count(), 1);
    }

    #[test]
    fn test_different_note_is_a_new_observation() {
        let f = fixture();
        let (a, _) = create_observation(
            &f.repo,
            f.session,
            f.object,
            ObservationRequest::naked_eye().with_note("first look"),
        )
        .unwrap();
        let (b, created) =
            create_observation(&f.repo, f.session, f.object, ObservationRequest::naked_eye())
                .unwrap();
        assert!(created);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_observation_clears_watch_flag() {
        let f = fixture();
        assert_eq!(f.repo.watch_list().unwrap().len(), 1);

        create_observation(&f.repo, f.session, f.object, ObservationRequest::naked_eye()).unwrap();
        assert!(!f.repo.get_object(f.object).unwrap().to_be_watched);
        assert!(f.repo.watch_list().unwrap().is_empty());
    }

    #[test]
    fn test_existing_observation_still_clears_watch_flag() {
        let f = fixture();
        create_observation(&f.repo, f.session, f.object, ObservationRequest::naked_eye()).unwrap();

        let mut object = f.repo.get_object(f.object).unwrap();
        object.to_be_watched = true;
        f.repo.update_object(&object).unwrap();

        let (_, created) =
            create_observation(&f.repo, f.session, f.object, ObservationRequest::naked_eye())
                .unwrap();
        assert!(!created);
        assert!(!f.repo.get_object(f.object).unwrap().to_be_watched);
    }

    #[test]
    fn test_dangling_reference_is_constraint_violation() {
        let f = fixture();
        let request = ObservationRequest::visual(f.telescope, EyePieceId(99), None);
        let err = create_observation(&f.repo, f.session, f.object, request).unwrap_err();
        match err {
            LogbookError::Repository(e) => {
                assert!(e.is_constraint_violation());
                assert_eq!(e.context().field.as_deref(), Some("eyepiece"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(f.repo.get_object(f.object).unwrap().to_be_watched);
    }

    #[test]
    fn test_observation_magnification() {
        let f = fixture();
        let (visual, _) = create_observation(
            &f.repo,
            f.session,
            f.object,
            ObservationRequest::visual(f.telescope, f.eyepiece, Some(f.barlow)),
        )
        .unwrap();
        assert_eq!(observation_magnification(&f.repo, &visual).unwrap(), Some(250));

        let (imaging, _) = create_observation(
            &f.repo,
            f.session,
            f.object,
            ObservationRequest::imaging(f.telescope, f.camera),
        )
        .unwrap();
        assert_eq!(observation_magnification(&f.repo, &imaging).unwrap(), None);

        let (binocular, _) = create_observation(
            &f.repo,
            f.session,
            f.object,
            ObservationRequest::binocular(f.binocular),
        )
        .unwrap();
        assert_eq!(observation_magnification(&f.repo, &binocular).unwrap(), Some(10));

        let (naked, _) =
            create_observation(&f.repo, f.session, f.object, ObservationRequest::naked_eye())
                .unwrap();
        assert!(naked.naked_eye());
        assert_eq!(observation_magnification(&f.repo, &naked).unwrap(), None);

        // The stored telescope stays unconfigured
        assert!(f.repo.get_telescope(f.telescope).unwrap().eyepiece().is_none());
    }

    #[test]
    fn test_observation_field_of_view() {
        let f = fixture();
        let (visual, _) = create_observation(
            &f.repo,
            f.session,
            f.object,
            ObservationRequest::visual(f.telescope, f.eyepiece, None),
        )
        .unwrap();
        let fov = observation_field_of_view(&f.repo, &visual).unwrap();
        assert_eq!(fov.map(|d| d.value()), Some(0.42));

        let (binocular, _) = create_observation(
            &f.repo,
            f.session,
            f.object,
            ObservationRequest::binocular(f.binocular),
        )
        .unwrap();
        assert_eq!(observation_field_of_view(&f.repo, &binocular).unwrap(), None);
    }

    #[test]
    fn test_update_observation_note() {
        let f = fixture();
        let (plain, _) =
            create_observation(&f.repo, f.session, f.object, ObservationRequest::naked_eye())
                .unwrap();
        let (noted, _) = create_observation(
            &f.repo,
            f.session,
            f.object,
            ObservationRequest::naked_eye().with_note("hazy"),
        )
        .unwrap();

        let updated =
            update_observation_note(&f.repo, plain.id, Some("clear skies".to_string())).unwrap();
        assert_eq!(updated.note.as_deref(), Some("clear skies"));

        // The old tuple is free again, so the same request creates a new row
        let (_, created) =
            create_observation(&f.repo, f.session, f.object, ObservationRequest::naked_eye())
                .unwrap();
        assert!(created);

        // Taking the note of another observation collides with it
        let err = update_observation_note(&f.repo, plain.id, Some("hazy".to_string())).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(f.repo.get_observation(noted.id).unwrap().note.as_deref(), Some("hazy"));
    }
}
