//! Session and object queries, and the small catalogue edits the logbook
//! exposes.

use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{KindId, LocationId, Object, ObjectId, Observation, Session, Stored};

/// A session together with everything observed during it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithObservations {
    pub session: Stored<Session>,
    pub observations: Vec<Stored<Observation>>,
}

fn with_observations<R: FullRepository + ?Sized>(
    repo: &R,
    session: Stored<Session>,
) -> RepositoryResult<SessionWithObservations> {
    let observations = repo.observations_for_session(session.id)?;
    Ok(SessionWithObservations {
        session,
        observations,
    })
}

/// The session held on `date`, if any.
pub fn get_session<R: FullRepository + ?Sized>(
    repo: &R,
    date: NaiveDate,
) -> RepositoryResult<Option<SessionWithObservations>> {
    info!("Service layer: fetching session of {}", date);
    repo.find_session_by_date(date)?
        .map(|session| with_observations(repo, session))
        .transpose()
}

/// All sessions between `from` and `to` inclusive, in date order.
pub fn get_sessions<R: FullRepository + ?Sized>(
    repo: &R,
    from: NaiveDate,
    to: NaiveDate,
) -> RepositoryResult<Vec<SessionWithObservations>> {
    info!("Service layer: fetching sessions from {} to {}", from, to);
    repo.sessions_between(from, to)?
        .into_iter()
        .map(|session| with_observations(repo, session))
        .collect()
}

/// Every recorded observation of `object`.
pub fn get_observations_of_object<R: FullRepository + ?Sized>(
    repo: &R,
    object: ObjectId,
) -> RepositoryResult<Vec<Stored<Observation>>> {
    repo.get_object(object)?;
    repo.observations_of_object(object)
}

/// Flip the favourite flag of `object` and return the saved row.
pub fn toggle_favourite<R: FullRepository + ?Sized>(
    repo: &R,
    object: ObjectId,
) -> RepositoryResult<Stored<Object>> {
    let mut stored = repo.get_object(object)?;
    stored.favourite = !stored.favourite;
    info!(
        "Service layer: object '{}' favourite={}",
        stored.name, stored.favourite
    );
    repo.update_object(&stored)?;
    Ok(stored)
}

/// Classify `object`, or clear its classification with `None`.
pub fn set_object_kind<R: FullRepository + ?Sized>(
    repo: &R,
    object: ObjectId,
    kind: Option<KindId>,
) -> RepositoryResult<Stored<Object>> {
    let mut stored = repo.get_object(object)?;
    stored.kind = kind;
    repo.update_object(&stored)?;
    Ok(stored)
}

/// Delete a location nobody observed from.
///
/// # Returns
/// * `Ok(true)` if the location was deleted
/// * `Ok(false)` if sessions still reference it; nothing is changed
/// * `Err` if the location does not exist
pub fn delete_location<R: FullRepository + ?Sized>(
    repo: &R,
    location: LocationId,
) -> RepositoryResult<bool> {
    info!("Service layer: deleting location {}", location);
    let deleted = repo.delete_location_if_unused(location)?;
    if !deleted {
        warn!("Location {} is still referenced by sessions, not deleted", location);
    }
    Ok(deleted)
}
