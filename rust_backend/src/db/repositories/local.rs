//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data lives in memory
//! behind a single lock, which makes every trait operation atomic: the
//! observation get-or-insert and its watch-list update, and the
//! check-then-delete of a location, cannot interleave with other writers.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;
use parking_lot::RwLock;

use crate::db::repository::*;
use crate::models::*;

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same underlying data.
///
/// # Example
/// ```
/// use astrolog::db::repositories::LocalRepository;
/// use astrolog::db::repository::EquipmentRepository;
/// use astrolog::models::Telescope;
///
/// let repo = LocalRepository::new();
/// let telescope = repo
///     .store_telescope(Telescope::new("Explorer 150P", 150.0, 750.0))
///     .unwrap();
/// assert_eq!(repo.get_telescope(telescope.id).unwrap().f_ratio(), 5.0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

/// Rows of one entity type, keyed by ID in insertion order.
struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
    next_id: i64,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Entity> Table<T> {
    fn insert(&mut self, record: T) -> Stored<T> {
        let id = T::Id::from(self.next_id);
        self.next_id += 1;
        self.rows.insert(id, record.clone());
        Stored::new(id, record)
    }

    fn get(&self, id: T::Id) -> RepositoryResult<Stored<T>> {
        self.rows
            .get(&id)
            .cloned()
            .map(|record| Stored::new(id, record))
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("{} {} not found", T::NAME, id),
                    ErrorContext::new(format!("get_{}", T::NAME))
                        .with_entity(T::NAME)
                        .with_entity_id(id),
                )
            })
    }

    fn contains(&self, id: T::Id) -> bool {
        self.rows.contains_key(&id)
    }

    fn all(&self) -> Vec<Stored<T>> {
        self.filter(|_| true)
    }

    fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<Stored<T>> {
        self.rows
            .iter()
            .filter(|(_, record)| predicate(record))
            .map(|(id, record)| Stored::new(*id, record.clone()))
            .collect()
    }

    fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<Stored<T>> {
        self.rows
            .iter()
            .find(|(_, record)| predicate(record))
            .map(|(id, record)| Stored::new(*id, record.clone()))
    }

    fn replace(&mut self, stored: &Stored<T>) -> RepositoryResult<()> {
        let slot = self.rows.get_mut(&stored.id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("{} {} not found", T::NAME, stored.id),
                ErrorContext::new(format!("update_{}", T::NAME))
                    .with_entity(T::NAME)
                    .with_entity_id(stored.id),
            )
        })?;
        *slot = stored.record.clone();
        Ok(())
    }
}

#[derive(Default)]
struct LocalData {
    telescopes: Table<Telescope>,
    eyepieces: Table<EyePiece>,
    barlows: Table<Barlow>,
    cameras: Table<Camera>,
    front_filters: Table<FrontFilter>,
    filters: Table<Filter>,
    binoculars: Table<Binocular>,

    objects: Table<Object>,
    alt_names: Table<AltName>,
    structures: Table<Structure>,
    kinds: Table<Kind>,

    locations: Table<Location>,
    conditions: Table<Condition>,
    sessions: Table<Session>,
    images: Table<Image>,
    observations: Table<Observation>,
    users: Table<User>,

    // Unique index over the full observation tuple
    observation_index: HashMap<ObservationKey, ObservationId>,

    // Committed writes, for asserting on idempotency
    writes: u64,

    // Connection health
    is_unhealthy: bool,
}

impl LocalData {
    /// Fail with a constraint violation when `id` is set but not present in `table`.
    fn require<T: Entity>(
        table: &Table<T>,
        id: Option<T::Id>,
        operation: &str,
        entity: &str,
        field: &str,
    ) -> RepositoryResult<()> {
        match id {
            Some(id) if !table.contains(id) => Err(RepositoryError::constraint_with_context(
                format!("{} references missing {} {}", entity, T::NAME, id),
                ErrorContext::new(operation)
                    .with_entity(entity)
                    .with_field(field)
                    .with_entity_id(id),
            )),
            _ => Ok(()),
        }
    }

    fn check_observation_references(
        &self,
        observation: &Observation,
        operation: &str,
    ) -> RepositoryResult<()> {
        let entity = Observation::NAME;
        Self::require(&self.sessions, Some(observation.session), operation, entity, "session")?;
        Self::require(&self.objects, Some(observation.object), operation, entity, "object")?;
        Self::require(&self.binoculars, observation.binocular, operation, entity, "binocular")?;
        Self::require(&self.telescopes, observation.telescope, operation, entity, "telescope")?;
        Self::require(&self.eyepieces, observation.eyepiece, operation, entity, "eyepiece")?;
        Self::require(&self.barlows, observation.barlow, operation, entity, "barlow")?;
        Self::require(&self.cameras, observation.camera, operation, entity, "camera")?;
        Self::require(&self.filters, observation.optic_filter, operation, entity, "optic_filter")?;
        Self::require(
            &self.front_filters,
            observation.front_filter,
            operation,
            entity,
            "front_filter",
        )?;
        Self::require(&self.images, observation.image, operation, entity, "image")
    }

    /// Clear the watch-list flag of `object`, writing only when it is set.
    fn mark_observed(&mut self, object: ObjectId) -> RepositoryResult<()> {
        let mut stored = self.objects.get(object)?;
        if stored.to_be_watched {
            stored.to_be_watched = false;
            self.objects.replace(&stored)?;
            self.writes += 1;
            debug!("Object '{}' removed from the watch-list", stored.name);
        }
        Ok(())
    }
}

/// Range check shared by humidity and moon phase.
fn check_percentage(
    value: Option<i32>,
    operation: &str,
    entity: &str,
    field: &str,
) -> RepositoryResult<()> {
    match value {
        Some(v) if !(0..=100).contains(&v) => Err(RepositoryError::constraint_with_context(
            format!("{} must lie in 0..=100, got {}", field, v),
            ErrorContext::new(operation)
                .with_entity(entity)
                .with_field(field),
        )),
        _ => Ok(()),
    }
}

fn check_positive(value: f64, operation: &str, entity: &str, field: &str) -> RepositoryResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(RepositoryError::constraint_with_context(
            format!("{} must be positive, got {}", field, value),
            ErrorContext::new(operation)
                .with_entity(entity)
                .with_field(field),
        ))
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_unhealthy = !healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_unhealthy: data.is_unhealthy,
            ..Default::default()
        };
    }

    /// Number of writes committed so far.
    pub fn write_count(&self) -> u64 {
        self.data.read().writes
    }

    /// Get the number of observations stored.
    pub fn observation_count(&self) -> usize {
        self.data.read().observations.rows.len()
    }

    pub fn condition_count(&self) -> usize {
        self.data.read().conditions.rows.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if self.data.read().is_unhealthy {
            return Err(RepositoryError::connection("Repository is not healthy"));
        }
        Ok(())
    }

    /// Helper for the common read pattern.
    fn read<T>(&self, f: impl FnOnce(&LocalData) -> RepositoryResult<T>) -> RepositoryResult<T> {
        self.check_health()?;
        f(&self.data.read())
    }

    /// Helper for the common write pattern; counts the write when `f` succeeds.
    fn write<T>(
        &self,
        f: impl FnOnce(&mut LocalData) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        self.check_health()?;
        let mut data = self.data.write();
        let result = f(&mut data)?;
        data.writes += 1;
        Ok(result)
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Equipment Repository ====================

impl EquipmentRepository for LocalRepository {
    fn store_telescope(&self, mut telescope: Telescope) -> RepositoryResult<Stored<Telescope>> {
        let op = "store_telescope";
        check_positive(telescope.aperture.value(), op, Telescope::NAME, "aperture")?;
        check_positive(telescope.focal_length.value(), op, Telescope::NAME, "focal_length")?;
        telescope.detach_all();
        self.write(|d| Ok(d.telescopes.insert(telescope)))
    }

    fn get_telescope(&self, id: TelescopeId) -> RepositoryResult<Stored<Telescope>> {
        self.read(|d| d.telescopes.get(id))
    }

    fn list_telescopes(&self) -> RepositoryResult<Vec<Stored<Telescope>>> {
        self.read(|d| Ok(d.telescopes.all()))
    }

    fn store_eyepiece(&self, eyepiece: EyePiece) -> RepositoryResult<Stored<EyePiece>> {
        check_positive(
            eyepiece.focal_length.value(),
            "store_eyepiece",
            EyePiece::NAME,
            "focal_length",
        )?;
        self.write(|d| Ok(d.eyepieces.insert(eyepiece)))
    }

    fn get_eyepiece(&self, id: EyePieceId) -> RepositoryResult<Stored<EyePiece>> {
        self.read(|d| d.eyepieces.get(id))
    }

    fn list_eyepieces(&self) -> RepositoryResult<Vec<Stored<EyePiece>>> {
        self.read(|d| Ok(d.eyepieces.all()))
    }

    fn store_barlow(&self, barlow: Barlow) -> RepositoryResult<Stored<Barlow>> {
        if barlow.multiplier < 2 {
            return Err(RepositoryError::constraint_with_context(
                format!("multiplier must be greater than 1, got {}", barlow.multiplier),
                ErrorContext::new("store_barlow")
                    .with_entity(Barlow::NAME)
                    .with_field("multiplier"),
            ));
        }
        self.write(|d| Ok(d.barlows.insert(barlow)))
    }

    fn get_barlow(&self, id: BarlowId) -> RepositoryResult<Stored<Barlow>> {
        self.read(|d| d.barlows.get(id))
    }

    fn list_barlows(&self) -> RepositoryResult<Vec<Stored<Barlow>>> {
        self.read(|d| Ok(d.barlows.all()))
    }

    fn store_camera(&self, camera: Camera) -> RepositoryResult<Stored<Camera>> {
        self.write(|d| Ok(d.cameras.insert(camera)))
    }

    fn get_camera(&self, id: CameraId) -> RepositoryResult<Stored<Camera>> {
        self.read(|d| d.cameras.get(id))
    }

    fn list_cameras(&self) -> RepositoryResult<Vec<Stored<Camera>>> {
        self.read(|d| Ok(d.cameras.all()))
    }

    fn store_front_filter(&self, filter: FrontFilter) -> RepositoryResult<Stored<FrontFilter>> {
        self.write(|d| Ok(d.front_filters.insert(filter)))
    }

    fn get_front_filter(&self, id: FrontFilterId) -> RepositoryResult<Stored<FrontFilter>> {
        self.read(|d| d.front_filters.get(id))
    }

    fn list_front_filters(&self) -> RepositoryResult<Vec<Stored<FrontFilter>>> {
        self.read(|d| Ok(d.front_filters.all()))
    }

    fn store_filter(&self, filter: Filter) -> RepositoryResult<Stored<Filter>> {
        self.write(|d| Ok(d.filters.insert(filter)))
    }

    fn get_filter(&self, id: FilterId) -> RepositoryResult<Stored<Filter>> {
        self.read(|d| d.filters.get(id))
    }

    fn list_filters(&self) -> RepositoryResult<Vec<Stored<Filter>>> {
        self.read(|d| Ok(d.filters.all()))
    }

    fn store_binocular(&self, binocular: Binocular) -> RepositoryResult<Stored<Binocular>> {
        check_positive(
            binocular.aperture.value(),
            "store_binocular",
            Binocular::NAME,
            "aperture",
        )?;
        self.write(|d| Ok(d.binoculars.insert(binocular)))
    }

    fn get_binocular(&self, id: BinocularId) -> RepositoryResult<Stored<Binocular>> {
        self.read(|d| d.binoculars.get(id))
    }

    fn list_binoculars(&self) -> RepositoryResult<Vec<Stored<Binocular>>> {
        self.read(|d| Ok(d.binoculars.all()))
    }
}

// ==================== Catalog Repository ====================

impl CatalogRepository for LocalRepository {
    fn store_object(&self, object: Object) -> RepositoryResult<Stored<Object>> {
        self.write(|d| {
            let op = "store_object";
            LocalData::require(&d.structures, object.structure, op, Object::NAME, "structure")?;
            LocalData::require(&d.kinds, object.kind, op, Object::NAME, "kind")?;
            Ok(d.objects.insert(object))
        })
    }

    fn get_object(&self, id: ObjectId) -> RepositoryResult<Stored<Object>> {
        self.read(|d| d.objects.get(id))
    }

    fn find_object_by_name(&self, name: &str) -> RepositoryResult<Option<Stored<Object>>> {
        self.read(|d| Ok(d.objects.find(|o| o.name == name)))
    }

    fn list_objects(&self) -> RepositoryResult<Vec<Stored<Object>>> {
        self.read(|d| Ok(d.objects.all()))
    }

    fn update_object(&self, object: &Stored<Object>) -> RepositoryResult<()> {
        self.write(|d| {
            let op = "update_object";
            LocalData::require(&d.structures, object.structure, op, Object::NAME, "structure")?;
            LocalData::require(&d.kinds, object.kind, op, Object::NAME, "kind")?;
            d.objects.replace(object)
        })
    }

    fn watch_list(&self) -> RepositoryResult<Vec<Stored<Object>>> {
        self.read(|d| Ok(d.objects.filter(|o| o.to_be_watched)))
    }

    fn add_alt_name(&self, object: ObjectId, name: &str) -> RepositoryResult<Stored<AltName>> {
        self.write(|d| {
            let op = "add_alt_name";
            LocalData::require(&d.objects, Some(object), op, AltName::NAME, "object")?;
            if d.alt_names.find(|alt| alt.name == name).is_some() {
                return Err(RepositoryError::constraint_with_context(
                    format!("alternate name '{}' is already in use", name),
                    ErrorContext::new(op)
                        .with_entity(AltName::NAME)
                        .with_field("name"),
                ));
            }
            Ok(d.alt_names.insert(AltName {
                object,
                name: name.to_string(),
            }))
        })
    }

    fn alt_names_of(&self, object: ObjectId) -> RepositoryResult<Vec<Stored<AltName>>> {
        self.read(|d| Ok(d.alt_names.filter(|alt| alt.object == object)))
    }

    fn store_structure(&self, structure: Structure) -> RepositoryResult<Stored<Structure>> {
        self.write(|d| Ok(d.structures.insert(structure)))
    }

    fn get_structure(&self, id: StructureId) -> RepositoryResult<Stored<Structure>> {
        self.read(|d| d.structures.get(id))
    }

    fn objects_in_structure(&self, id: StructureId) -> RepositoryResult<Vec<Stored<Object>>> {
        self.read(|d| Ok(d.objects.filter(|o| o.structure == Some(id))))
    }

    fn get_or_create_kind(&self, name: &str) -> RepositoryResult<(Stored<Kind>, bool)> {
        if let Some(existing) = self.read(|d| Ok(d.kinds.find(|k| k.name == name)))? {
            return Ok((existing, false));
        }
        self.write(|d| match d.kinds.find(|k| k.name == name) {
            // Lost a race against another writer between the two locks
            Some(existing) => Ok((existing, false)),
            None => Ok((d.kinds.insert(Kind::new(name)), true)),
        })
    }

    fn get_kind(&self, id: KindId) -> RepositoryResult<Stored<Kind>> {
        self.read(|d| d.kinds.get(id))
    }

    fn list_kinds(&self) -> RepositoryResult<Vec<Stored<Kind>>> {
        self.read(|d| Ok(d.kinds.all()))
    }
}

// ==================== Logbook Repository ====================

impl LogbookRepository for LocalRepository {
    fn health_check(&self) -> RepositoryResult<bool> {
        Ok(!self.data.read().is_unhealthy)
    }

    fn store_location(&self, location: Location) -> RepositoryResult<Stored<Location>> {
        self.write(|d| Ok(d.locations.insert(location)))
    }

    fn get_location(&self, id: LocationId) -> RepositoryResult<Stored<Location>> {
        self.read(|d| d.locations.get(id))
    }

    fn list_locations(&self) -> RepositoryResult<Vec<Stored<Location>>> {
        self.read(|d| Ok(d.locations.all()))
    }

    fn delete_location_if_unused(&self, id: LocationId) -> RepositoryResult<bool> {
        self.check_health()?;
        let mut data = self.data.write();
        data.locations.get(id)?;
        if data.sessions.find(|s| s.location == id).is_some() {
            return Ok(false);
        }
        data.locations.rows.remove(&id);
        data.writes += 1;
        Ok(true)
    }

    fn sessions_at_location(&self, id: LocationId) -> RepositoryResult<Vec<Stored<Session>>> {
        self.read(|d| Ok(d.sessions.filter(|s| s.location == id)))
    }

    fn store_condition(&self, condition: Condition) -> RepositoryResult<Stored<Condition>> {
        check_percentage(
            condition.humidity,
            "store_condition",
            Condition::NAME,
            "humidity",
        )?;
        self.write(|d| Ok(d.conditions.insert(condition)))
    }

    fn get_condition(&self, id: ConditionId) -> RepositoryResult<Stored<Condition>> {
        self.read(|d| d.conditions.get(id))
    }

    fn store_image(&self, image: Image) -> RepositoryResult<Stored<Image>> {
        self.write(|d| Ok(d.images.insert(image)))
    }

    fn get_image(&self, id: ImageId) -> RepositoryResult<Stored<Image>> {
        self.read(|d| d.images.get(id))
    }

    fn store_session(&self, session: Session) -> RepositoryResult<Stored<Session>> {
        let op = "store_session";
        check_percentage(session.moon_phase, op, Session::NAME, "moon_phase")?;
        self.write(|d| {
            LocalData::require(&d.locations, Some(session.location), op, Session::NAME, "location")?;
            LocalData::require(&d.conditions, session.condition, op, Session::NAME, "condition")?;
            Ok(d.sessions.insert(session))
        })
    }

    fn get_or_create_session(&self, session: Session) -> RepositoryResult<(Stored<Session>, bool)> {
        let op = "get_or_create_session";
        check_percentage(session.moon_phase, op, Session::NAME, "moon_phase")?;
        self.check_health()?;
        let mut data = self.data.write();
        if let Some(existing) = data
            .sessions
            .find(|s| s.date == session.date && s.location == session.location)
        {
            return Ok((existing, false));
        }
        LocalData::require(&data.locations, Some(session.location), op, Session::NAME, "location")?;
        LocalData::require(&data.conditions, session.condition, op, Session::NAME, "condition")?;
        let stored = data.sessions.insert(session);
        data.writes += 1;
        Ok((stored, true))
    }

    fn get_session(&self, id: SessionId) -> RepositoryResult<Stored<Session>> {
        self.read(|d| d.sessions.get(id))
    }

    fn find_session_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<Stored<Session>>> {
        self.read(|d| Ok(d.sessions.find(|s| s.date == date)))
    }

    fn sessions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<Stored<Session>>> {
        self.read(|d| {
            let mut sessions = d.sessions.filter(|s| start <= s.date && s.date <= end);
            sessions.sort_by_key(|s| (s.date, s.id));
            Ok(sessions)
        })
    }

    fn record_observation(
        &self,
        observation: Observation,
    ) -> RepositoryResult<(Stored<Observation>, bool)> {
        self.check_health()?;
        let mut data = self.data.write();
        data.check_observation_references(&observation, "record_observation")?;

        let key = observation.key();
        if let Some(&id) = data.observation_index.get(&key) {
            let existing = data.observations.get(id)?;
            data.mark_observed(existing.object)?;
            return Ok((existing, false));
        }

        let object = observation.object;
        let stored = data.observations.insert(observation);
        data.observation_index.insert(key, stored.id);
        data.writes += 1;
        data.mark_observed(object)?;
        Ok((stored, true))
    }

    fn get_observation(&self, id: ObservationId) -> RepositoryResult<Stored<Observation>> {
        self.read(|d| d.observations.get(id))
    }

    fn update_observation(&self, observation: &Stored<Observation>) -> RepositoryResult<()> {
        self.write(|d| {
            let op = "update_observation";
            let previous = d.observations.get(observation.id)?;
            d.check_observation_references(observation, op)?;

            let key = observation.key();
            if let Some(&other) = d.observation_index.get(&key) {
                if other != observation.id {
                    return Err(RepositoryError::constraint_with_context(
                        format!("observation {} already records the same sighting", other),
                        ErrorContext::new(op)
                            .with_entity(Observation::NAME)
                            .with_entity_id(observation.id),
                    ));
                }
            }

            d.observation_index.remove(&previous.key());
            d.observation_index.insert(key, observation.id);
            d.observations.replace(observation)
        })
    }

    fn observations_for_session(
        &self,
        id: SessionId,
    ) -> RepositoryResult<Vec<Stored<Observation>>> {
        self.read(|d| Ok(d.observations.filter(|o| o.session == id)))
    }

    fn observations_of_object(
        &self,
        id: ObjectId,
    ) -> RepositoryResult<Vec<Stored<Observation>>> {
        self.read(|d| Ok(d.observations.filter(|o| o.object == id)))
    }
}

// ==================== Account Repository ====================

impl AccountRepository for LocalRepository {
    fn store_user(&self, user: User) -> RepositoryResult<Stored<User>> {
        self.write(|d| {
            if d.users.find(|u| u.username == user.username).is_some() {
                return Err(RepositoryError::constraint_with_context(
                    format!("username '{}' is already taken", user.username),
                    ErrorContext::new("store_user")
                        .with_entity(User::NAME)
                        .with_field("username"),
                ));
            }
            Ok(d.users.insert(user))
        })
    }

    fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<Stored<User>>> {
        self.read(|d| Ok(d.users.find(|u| u.username == username)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horsens() -> Location {
        Location {
            name: "Horsens".to_string(),
            country: "Denmark".to_string(),
            latitude: "55:51:38".to_string(),
            longitude: "-9:51:1".to_string(),
            altitude: 0,
            utc_offset: 1,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().unwrap());
        assert!(matches!(
            repo.list_objects(),
            Err(RepositoryError::ConnectionError { .. })
        ));
    }

    #[test]
    fn test_ids_are_assigned_per_table() {
        let repo = LocalRepository::new();
        let a = repo.store_filter(Filter::new("Moon filter")).unwrap();
        let b = repo.store_filter(Filter::new("Red filter")).unwrap();
        let c = repo.store_front_filter(FrontFilter::new("Solar")).unwrap();
        assert_eq!(a.id, FilterId(1));
        assert_eq!(b.id, FilterId(2));
        assert_eq!(c.id, FrontFilterId(1));
        assert_eq!(repo.list_filters().unwrap().len(), 2);
    }

    #[test]
    fn test_stored_telescope_starts_empty() {
        let repo = LocalRepository::new();
        let mut telescope = Telescope::new("Explorer 150P", 150.0, 750.0);
        telescope.attach_eyepiece(EyePiece::new("Plössl", 6.0, 1.25));

        let stored = repo.store_telescope(telescope).unwrap();
        assert!(stored.eyepiece().is_none());

        let mut first = repo.get_telescope(stored.id).unwrap();
        first.attach_eyepiece(EyePiece::new("Plössl", 6.0, 1.25));
        let second = repo.get_telescope(stored.id).unwrap();
        assert!(second.eyepiece().is_none());
    }

    #[test]
    fn test_equipment_constraints() {
        let repo = LocalRepository::new();
        let err = repo
            .store_telescope(Telescope::new("Broken", 0.0, 750.0))
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(err.context().field.as_deref(), Some("aperture"));

        let err = repo.store_barlow(Barlow::new("1x", 1)).unwrap_err();
        assert_eq!(err.context().field.as_deref(), Some("multiplier"));

        assert!(repo.store_eyepiece(EyePiece::new("Zero", 0.0, 1.25)).is_err());
        assert_eq!(repo.write_count(), 0);
    }

    #[test]
    fn test_not_found_error() {
        let repo = LocalRepository::new();
        let err = repo.get_session(SessionId(999)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().entity_id.as_deref(), Some("999"));
    }

    #[test]
    fn test_humidity_constraint() {
        let repo = LocalRepository::new();
        let condition = Condition {
            temperature: 5,
            humidity: Some(101),
            seeing: None,
        };
        let err = repo.store_condition(condition).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(err.context().field.as_deref(), Some("humidity"));
    }

    #[test]
    fn test_moon_phase_constraint() {
        let repo = LocalRepository::new();
        let location = repo.store_location(horsens()).unwrap();

        let mut session = Session::new(date(2023, 9, 13), location.id);
        session.moon_phase = Some(-1);
        assert!(repo.store_session(session.clone()).unwrap_err().is_constraint_violation());

        session.moon_phase = Some(100);
        assert!(repo.store_session(session).is_ok());
    }

    #[test]
    fn test_session_requires_location() {
        let repo = LocalRepository::new();
        let err = repo
            .store_session(Session::new(date(2023, 9, 13), LocationId(5)))
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(err.context().field.as_deref(), Some("location"));
    }

    #[test]
    fn test_get_or_create_session() {
        let repo = LocalRepository::new();
        let location = repo.store_location(horsens()).unwrap();
        let (first, created) = repo
            .get_or_create_session(Session::new(date(2023, 9, 13), location.id))
            .unwrap();
        assert!(created);
        let (second, created) = repo
            .get_or_create_session(Session::new(date(2023, 9, 13), location.id))
            .unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_sessions_between_is_inclusive_and_ordered() {
        let repo = LocalRepository::new();
        let location = repo.store_location(horsens()).unwrap();
        for day in [20, 1, 31, 15] {
            repo.store_session(Session::new(date(2013, 12, day), location.id))
                .unwrap();
        }
        repo.store_session(Session::new(date(2014, 1, 1), location.id))
            .unwrap();

        let sessions = repo
            .sessions_between(date(2013, 12, 1), date(2013, 12, 31))
            .unwrap();
        let days: Vec<u32> = sessions.iter().map(|s| chrono::Datelike::day(&s.date)).collect();
        assert_eq!(days, vec![1, 15, 20, 31]);
    }

    #[test]
    fn test_alt_names_are_unique() {
        let repo = LocalRepository::new();
        let orion = repo.store_object(Object::new("Orion Nebula")).unwrap();
        let other = repo.store_object(Object::new("Other")).unwrap();

        repo.add_alt_name(orion.id, "M42").unwrap();
        repo.add_alt_name(orion.id, "NGC 1976").unwrap();
        let err = repo.add_alt_name(other.id, "M42").unwrap_err();
        assert!(err.is_constraint_violation());

        let names: Vec<String> = repo
            .alt_names_of(orion.id)
            .unwrap()
            .into_iter()
            .map(|a| a.record.name)
            .collect();
        assert_eq!(names, vec!["M42".to_string(), "NGC 1976".to_string()]);
        assert!(repo.alt_names_of(other.id).unwrap().is_empty());
    }

    #[test]
    fn test_objects_in_structure() {
        let repo = LocalRepository::new();
        let orion = repo.store_structure(Structure::new("Orion")).unwrap();
        repo.store_object(Object::new("Betelgeuse").in_structure(orion.id))
            .unwrap();
        repo.store_object(Object::new("Rigel").in_structure(orion.id))
            .unwrap();
        repo.store_object(Object::new("Arcturus")).unwrap();

        let members = repo.objects_in_structure(orion.id).unwrap();
        assert_eq!(members.len(), 2);

        let err = repo
            .store_object(Object::new("Nowhere").in_structure(StructureId(42)))
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_get_or_create_kind() {
        let repo = LocalRepository::new();
        let (galaxy, created) = repo.get_or_create_kind("Galaxy").unwrap();
        assert!(created);
        let (again, created) = repo.get_or_create_kind("Galaxy").unwrap();
        assert!(!created);
        assert_eq!(galaxy.id, again.id);
        assert_eq!(repo.list_kinds().unwrap().len(), 1);
    }

    #[test]
    fn test_unique_usernames() {
        let repo = LocalRepository::new();
        let user = User {
            username: "daniel".to_string(),
            hashed_password: "salt$hash".to_string(),
        };
        repo.store_user(user.clone()).unwrap();
        assert!(repo.store_user(user).unwrap_err().is_constraint_violation());
        assert!(repo.find_user_by_username("daniel").unwrap().is_some());
        assert!(repo.find_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let repo = LocalRepository::new();
        repo.store_object(Object::new("Vega")).unwrap();
        repo.clear();
        assert!(repo.list_objects().unwrap().is_empty());
        assert_eq!(repo.write_count(), 0);
    }
}
