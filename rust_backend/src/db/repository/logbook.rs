//! Locations, sessions and observations.

use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::models::{
    Condition, ConditionId, Image, ImageId, Location, LocationId, ObjectId, Observation,
    ObservationId, Session, SessionId, Stored,
};

/// Repository trait for the observing log.
///
/// Writes that reference a missing row, or that break a range check
/// (humidity and moon phase must lie in `0..=100`), fail with
/// `RepositoryError::ConstraintViolation` and leave the store untouched.
pub trait LogbookRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backend is available.
    fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Locations ====================

    fn store_location(&self, location: Location) -> RepositoryResult<Stored<Location>>;
    fn get_location(&self, id: LocationId) -> RepositoryResult<Stored<Location>>;
    fn list_locations(&self) -> RepositoryResult<Vec<Stored<Location>>>;

    /// Delete a location unless a session references it.
    ///
    /// The check and the delete happen as one step.
    ///
    /// # Returns
    /// * `Ok(true)` - The location was removed
    /// * `Ok(false)` - At least one session references it; nothing changed
    /// * `Err(RepositoryError::NotFound)` - If the location does not exist
    fn delete_location_if_unused(&self, id: LocationId) -> RepositoryResult<bool>;

    fn sessions_at_location(&self, id: LocationId) -> RepositoryResult<Vec<Stored<Session>>>;

    // ==================== Conditions & Images ====================

    fn store_condition(&self, condition: Condition) -> RepositoryResult<Stored<Condition>>;
    fn get_condition(&self, id: ConditionId) -> RepositoryResult<Stored<Condition>>;

    fn store_image(&self, image: Image) -> RepositoryResult<Stored<Image>>;
    fn get_image(&self, id: ImageId) -> RepositoryResult<Stored<Image>>;

    // ==================== Sessions ====================

    fn store_session(&self, session: Session) -> RepositoryResult<Stored<Session>>;

    /// Look up a session by date and location, creating it from `session`
    /// when absent.
    fn get_or_create_session(&self, session: Session) -> RepositoryResult<(Stored<Session>, bool)>;

    fn get_session(&self, id: SessionId) -> RepositoryResult<Stored<Session>>;

    /// First session stored for `date`, if any.
    fn find_session_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<Stored<Session>>>;

    /// Sessions with `start <= date <= end`, ordered by date.
    fn sessions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<Stored<Session>>>;

    // ==================== Observations ====================

    /// Record an observation and take its object off the watch-list, as one
    /// atomic step.
    ///
    /// Observations are unique over their full field tuple (see
    /// [`ObservationKey`](crate::models::ObservationKey)). When a row with the
    /// same tuple exists it is returned instead of inserting a duplicate.
    /// The object's `to_be_watched` flag is written only when it is set.
    ///
    /// # Returns
    /// `(observation, created)` where `created` is true only if a new row was
    /// inserted.
    fn record_observation(
        &self,
        observation: Observation,
    ) -> RepositoryResult<(Stored<Observation>, bool)>;

    fn get_observation(&self, id: ObservationId) -> RepositoryResult<Stored<Observation>>;

    /// Save changes to an existing observation (note, image).
    ///
    /// Fails with `RepositoryError::ConstraintViolation` when the change would
    /// make it identical to another observation.
    fn update_observation(&self, observation: &Stored<Observation>) -> RepositoryResult<()>;

    /// Observations logged during a session, in insertion order.
    fn observations_for_session(
        &self,
        id: SessionId,
    ) -> RepositoryResult<Vec<Stored<Observation>>>;

    /// Observations of an object across all sessions, in insertion order.
    fn observations_of_object(&self, id: ObjectId)
        -> RepositoryResult<Vec<Stored<Observation>>>;
}
