//! Service layer for business logic and orchestration.
//!
//! Services are free functions generic over any [`FullRepository`]
//! implementation. They enforce the rules that must hold regardless of the
//! storage backend: equipment combinations, report aggregation and account
//! preconditions.
//!
//! ```
//! use astrolog::db::repositories::LocalRepository;
//! use astrolog::db::repository::{CatalogRepository, LogbookRepository};
//! use astrolog::models::{Location, Object, Session};
//! use astrolog::services::{self, ObservationRequest};
//! use chrono::NaiveDate;
//!
//! let repo = LocalRepository::new();
//! let location = repo.store_location(Location {
//!     name: "Horsens".into(),
//!     country: "Denmark".into(),
//!     latitude: "55:51:38".into(),
//!     longitude: "-9:51:1".into(),
//!     altitude: 0,
//!     utc_offset: 1,
//! }).unwrap();
//! let date = NaiveDate::from_ymd_opt(2013, 12, 6).unwrap();
//! let session = repo.store_session(Session::new(date, location.id)).unwrap();
//! let vega = repo.store_object(Object::new("Vega")).unwrap();
//!
//! let (_, created) =
//!     services::create_observation(&repo, session.id, vega.id, ObservationRequest::naked_eye())
//!         .unwrap();
//! assert!(created);
//!
//! let report = services::get_monthly_report(&repo, 2013, 12).unwrap().unwrap();
//! assert_eq!(report.n_observations, 1);
//! ```
//!
//! [`FullRepository`]: crate::db::repository::FullRepository

pub mod accounts;
pub mod error;
pub mod observations;
pub mod reports;
pub mod sessions;


pub use accounts::{create_user, hash_password, valid_login, verify_password};
pub use error::{CredentialError, EquipmentRule, LogbookError, LogbookResult};
pub use observations::{
    configured_telescope, create_observation, observation_field_of_view,
    observation_magnification, update_observation_note, validate_equipment, ObservationRequest,
};
pub use reports::{get_monthly_report, get_report, get_yearly_report, DateRange, Report};
pub use sessions::{
    delete_location, get_observations_of_object, get_session, get_sessions, set_object_kind,
    toggle_favourite, SessionWithObservations,
};
