//! End-to-end tests of the logbook service layer against the local repository.

use astrolog::db::{
    CatalogRepository, EquipmentRepository, LocalRepository, LogbookConfig, LogbookRepository,
};
use astrolog::models::*;
use astrolog::services::{self, EquipmentRule, LogbookError, ObservationRequest};
use chrono::NaiveDate;

struct Logbook {
    repo: LocalRepository,
    location: LocationId,
    telescope: TelescopeId,
    eyepiece: EyePieceId,
    barlow: BarlowId,
    camera: CameraId,
    binocular: BinocularId,
    moon_filter: FilterId,
    solar_film: FrontFilterId,
}

impl Logbook {
    fn new() -> Self {
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
            .unwrap()
            .id;
        let telescope = repo
            .store_telescope(Telescope::new("Explorer 150P", 150.0, 750.0))
            .unwrap()
            .id;
        let eyepiece = repo
            .store_eyepiece(EyePiece::new("Plössl", 6.0, 1.25))
            .unwrap()
            .id;
        let barlow = repo.store_barlow(Barlow::new("Barlow 2x", 2)).unwrap().id;
        let camera = repo
            .store_camera(Camera::new("ZWO", "ASI224MC", 1.2))
            .unwrap()
            .id;
        let binocular = repo
            .store_binocular(Binocular::new("Celestron 10x50", 50.0, 10))
            .unwrap()
            .id;
        let moon_filter = repo.store_filter(Filter::new("Moon filter")).unwrap().id;
        let solar_film = repo
            .store_front_filter(FrontFilter::new("Baader solar film"))
            .unwrap()
            .id;

        Self {
            repo,
            location,
            telescope,
            eyepiece,
            barlow,
            camera,
            binocular,
            moon_filter,
            solar_film,
        }
    }

    fn session(&self, y: i32, m: u32, d: u32) -> SessionId {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        self.repo
            .store_session(Session::new(date, self.location))
            .unwrap()
            .id
    }

    fn object(&self, name: &str) -> ObjectId {
        self.repo.store_object(Object::new(name).watched()).unwrap().id
    }
}

#[test]
fn test_binoculars_reject_any_eyepiece() {
    let book = Logbook::new();
    let session = book.session(2013, 12, 6);
    let moon = book.object("Moon");

    let request = ObservationRequest {
        binocular: Some(book.binocular),
        eyepiece: Some(book.eyepiece),
        ..Default::default()
    };
    let err = services::create_observation(&book.repo, session, moon, request).unwrap_err();
    assert_eq!(err.equipment_rule(), Some(EquipmentRule::EyepieceWithBinoculars));
    assert_eq!(err.equipment_rule().map(|r| r.field()), Some("eyepiece"));
}

#[test]
fn test_binoculars_reject_optic_filter_but_allow_front_filter() {
    let book = Logbook::new();
    let session = book.session(2013, 12, 6);
    let moon = book.object("Moon");

    let err = services::create_observation(
        &book.repo,
        session,
        moon,
        ObservationRequest::binocular(book.binocular).with_filters(Some(book.moon_filter), None),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        LogbookError::InvalidEquipmentCombination(EquipmentRule::FilterWithBinoculars)
    ));

    let (_, created) = services::create_observation(
        &book.repo,
        session,
        moon,
        ObservationRequest::binocular(book.binocular).with_filters(None, Some(book.solar_film)),
    )
    .unwrap();
    assert!(created);
}

#[test]
fn test_telescope_alone_is_rejected() {
    let book = Logbook::new();
    let session = book.session(2013, 12, 6);
    let moon = book.object("Moon");

    let request = ObservationRequest {
        telescope: Some(book.telescope),
        ..Default::default()
    };
    let err = services::create_observation(&book.repo, session, moon, request).unwrap_err();
    assert_eq!(err.equipment_rule(), Some(EquipmentRule::TelescopeWithoutOptics));
    assert!(book.repo.get_object(moon).unwrap().to_be_watched);
}

#[test]
fn test_identical_requests_return_same_observation() {
    let book = Logbook::new();
    let session = book.session(2013, 12, 6);
    let moon = book.object("Moon");
    let request = ObservationRequest::visual(book.telescope, book.eyepiece, Some(book.barlow))
        .with_filters(Some(book.moon_filter), None)
        .with_note("Copernicus crater");

    let (first, created_first) =
        services::create_observation(&book.repo, session, moon, request.clone()).unwrap();
    let (second, created_second) =
        services::create_observation(&book.repo, session, moon, request).unwrap();

    assert!(created_first);
    assert!(!created_second);
    assert_eq!(first.id, second.id);
    assert_eq!(first, second);
}

#[test]
fn test_historical_magnification() {
    let book = Logbook::new();
    let session = book.session(2013, 12, 6);
    let moon = book.object("Moon");

    let (with_barlow, _) = services::create_observation(
        &book.repo,
        session,
        moon,
        ObservationRequest::visual(book.telescope, book.eyepiece, Some(book.barlow)),
    )
    .unwrap();
    let (plain, _) = services::create_observation(
        &book.repo,
        session,
        moon,
        ObservationRequest::visual(book.telescope, book.eyepiece, None),
    )
    .unwrap();
    let (imaged, _) = services::create_observation(
        &book.repo,
        session,
        moon,
        ObservationRequest::imaging(book.telescope, book.camera),
    )
    .unwrap();

    // Computing one never leaks configuration into the next
    assert_eq!(services::observation_magnification(&book.repo, &with_barlow).unwrap(), Some(250));
    assert_eq!(services::observation_magnification(&book.repo, &plain).unwrap(), Some(125));
    assert_eq!(services::observation_magnification(&book.repo, &imaged).unwrap(), None);

    let telescope = services::configured_telescope(&book.repo, &imaged)
        .unwrap()
        .unwrap();
    assert!(telescope.camera().is_some());
    assert!(telescope.eyepiece().is_none());
}

#[test]
fn test_moon_phase_out_of_range_surfaces_unchanged() {
    let book = Logbook::new();
    let mut session = Session::new(NaiveDate::from_ymd_opt(2013, 12, 6).unwrap(), book.location);
    session.moon_phase = Some(101);
    let err = book.repo.store_session(session).unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(err.context().field.as_deref(), Some("moon_phase"));
}

#[test]
fn test_monthly_report_end_to_end() {
    let book = Logbook::new();
    let first = book.session(2013, 12, 6);
    let second = book.session(2013, 12, 24);
    book.session(2014, 1, 2);
    let moon = book.object("Moon");
    let jupiter = book.object("Jupiter");
    let m42 = book.object("Orion Nebula");

    for (session, object, request) in [
        (first, moon, ObservationRequest::binocular(book.binocular)),
        (first, jupiter, ObservationRequest::visual(book.telescope, book.eyepiece, None)),
        (second, moon, ObservationRequest::naked_eye()),
        (second, jupiter, ObservationRequest::imaging(book.telescope, book.camera)),
        (second, m42, ObservationRequest::naked_eye()),
    ] {
        services::create_observation(&book.repo, session, object, request).unwrap();
    }

    let report = services::get_monthly_report(&book.repo, 2013, 12)
        .unwrap()
        .unwrap();
    assert_eq!(report.n_sessions, 2);
    assert_eq!(report.n_observations, 5);
    assert_eq!(report.unique_object_names(), vec!["Jupiter", "Moon", "Orion Nebula"]);
    assert_eq!(report.most_observed_names(), vec!["Jupiter", "Moon"]);

    // January has a session but nothing observed
    let january = services::get_monthly_report(&book.repo, 2014, 1)
        .unwrap()
        .unwrap();
    assert_eq!(january.n_observations, 0);

    assert!(services::get_monthly_report(&book.repo, 2014, 2)
        .unwrap()
        .is_none());
    assert!(matches!(
        services::get_monthly_report(&book.repo, 2014, 13),
        Err(LogbookError::InvalidDateRange(_))
    ));
}

#[test]
fn test_watch_list_is_consumed() {
    let book = Logbook::new();
    let session = book.session(2013, 12, 6);
    let moon = book.object("Moon");
    let saturn = book.object("Saturn");

    services::create_observation(&book.repo, session, moon, ObservationRequest::naked_eye())
        .unwrap();

    let watch_list: Vec<ObjectId> = book.repo.watch_list().unwrap().iter().map(|o| o.id).collect();
    assert_eq!(watch_list, vec![saturn]);
}

#[test]
fn test_accounts() {
    let book = Logbook::new();
    let mut settings = LogbookConfig::default().accounts;
    settings.bcrypt_cost = 4;

    services::create_user(&book.repo, &settings, "daniel", "orion-belt").unwrap();
    assert!(services::valid_login(&book.repo, "daniel", "orion-belt").unwrap());
    assert!(!services::valid_login(&book.repo, "daniel", "orion").unwrap());
}
