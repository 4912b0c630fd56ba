use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{
    Barlow, BarlowId, Binocular, BinocularId, Camera, CameraId, Condition, Entity, EyePiece,
    EyePieceId, Filter, FilterId, FrontFilter, FrontFilterId, Location, LocationId, Object,
    ObjectId, Session, Stored, Structure, StructureId, Telescope, TelescopeId,
};
use crate::services::{create_observation, ObservationRequest};

/// Entry of an equipment or location list, referenced elsewhere by `key`.
#[derive(Debug, Clone, Deserialize)]
pub struct Keyed<T> {
    pub key: String,
    #[serde(flatten)]
    pub item: T,
}

/// Sky object as exported, with its classification by name.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default)]
    pub alt_names: Vec<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub favourite: bool,
    #[serde(default)]
    pub to_be_watched: bool,
}

/// Observation as exported; equipment is referenced by key and the object by name.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationEntry {
    pub object: String,
    #[serde(default)]
    pub binocular: Option<String>,
    #[serde(default)]
    pub telescope: Option<String>,
    #[serde(default)]
    pub eyepiece: Option<String>,
    #[serde(default)]
    pub barlow: Option<String>,
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default)]
    pub optic_filter: Option<String>,
    #[serde(default)]
    pub front_filter: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionEntry {
    pub date: NaiveDate,
    pub location: String,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub moon_phase: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub observations: Vec<ObservationEntry>,
}

/// A complete logbook export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogbookExport {
    pub telescopes: Vec<Keyed<Telescope>>,
    pub eyepieces: Vec<Keyed<EyePiece>>,
    pub barlows: Vec<Keyed<Barlow>>,
    pub cameras: Vec<Keyed<Camera>>,
    pub front_filters: Vec<Keyed<FrontFilter>>,
    pub filters: Vec<Keyed<Filter>>,
    pub binoculars: Vec<Keyed<Binocular>>,
    pub objects: Vec<ObjectEntry>,
    pub locations: Vec<Keyed<Location>>,
    pub sessions: Vec<SessionEntry>,
}

/// Counts of what an import wrote. Rows that were already present are not
/// counted, except observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub equipment: usize,
    pub objects: usize,
    pub locations: usize,
    pub sessions: usize,
    pub observations_created: usize,
    pub observations_existing: usize,
}

/// Key to row-id lookup for one section of the export.
struct KeyMap<I> {
    section: &'static str,
    ids: HashMap<String, I>,
}

impl<I: Copy> KeyMap<I> {
    fn new(section: &'static str) -> Self {
        Self {
            section,
            ids: HashMap::new(),
        }
    }

    fn insert(&mut self, key: &str, id: I) -> Result<()> {
        if self.ids.insert(key.to_string(), id).is_some() {
            bail!("Duplicate key '{}' in {}", key, self.section);
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<I> {
        self.ids
            .get(key)
            .copied()
            .ok_or_else(|| anyhow!("Unknown {} key '{}'", self.section, key))
    }

    fn resolve(&self, key: Option<&String>) -> Result<Option<I>> {
        key.map(|key| self.get(key)).transpose()
    }
}

struct Equipment {
    telescopes: KeyMap<TelescopeId>,
    eyepieces: KeyMap<EyePieceId>,
    barlows: KeyMap<BarlowId>,
    cameras: KeyMap<CameraId>,
    front_filters: KeyMap<FrontFilterId>,
    filters: KeyMap<FilterId>,
    binoculars: KeyMap<BinocularId>,
}

impl Equipment {
    fn request(&self, entry: &ObservationEntry) -> Result<ObservationRequest> {
        Ok(ObservationRequest {
            binocular: self.binoculars.resolve(entry.binocular.as_ref())?,
            telescope: self.telescopes.resolve(entry.telescope.as_ref())?,
            eyepiece: self.eyepieces.resolve(entry.eyepiece.as_ref())?,
            barlow: self.barlows.resolve(entry.barlow.as_ref())?,
            camera: self.cameras.resolve(entry.camera.as_ref())?,
            optic_filter: self.filters.resolve(entry.optic_filter.as_ref())?,
            front_filter: self.front_filters.resolve(entry.front_filter.as_ref())?,
            note: entry.note.clone(),
            image: None,
        })
    }
}

/// Map every entry of a section to a row, reusing an identical stored row
/// when there is one. Returns the key map and the number of rows written.
fn register_section<T: Entity + PartialEq>(
    section: &'static str,
    entries: Vec<Keyed<T>>,
    existing: RepositoryResult<Vec<Stored<T>>>,
    mut store: impl FnMut(T) -> RepositoryResult<Stored<T>>,
) -> Result<(KeyMap<T::Id>, usize)> {
    let mut known = existing.with_context(|| format!("Failed to list {} rows", section))?;
    let mut map = KeyMap::new(section);
    let mut written = 0;
    for entry in entries {
        let found = known
            .iter()
            .find(|row| row.record == entry.item)
            .map(|row| row.id);
        let id = match found {
            Some(id) => {
                debug!("{} '{}' already present as {}", section, entry.key, id);
                id
            }
            None => {
                let row = store(entry.item)
                    .with_context(|| format!("Failed to store {} '{}'", section, entry.key))?;
                written += 1;
                let id = row.id;
                known.push(row);
                id
            }
        };
        map.insert(&entry.key, id)?;
    }
    Ok((map, written))
}

/// Unified interface for loading and importing logbook exports
pub struct LogbookLoader;

impl LogbookLoader {
    /// Read a logbook export from a JSON file
    pub fn load_from_file(path: &Path) -> Result<LogbookExport> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read logbook file {}", path.display()))?;
        Self::load_from_str(&content)
            .with_context(|| format!("Failed to parse logbook file {}", path.display()))
    }

    /// Read a logbook export from a JSON string
    pub fn load_from_str(json: &str) -> Result<LogbookExport> {
        let deserializer = &mut serde_json::Deserializer::from_str(json);
        serde_path_to_error::deserialize(deserializer).map_err(|e| {
            let path = e.path().to_string();
            anyhow!(e.into_inner()).context(format!("Invalid logbook data at '{}'", path))
        })
    }

    /// Read a JSON file and import it into `repo`
    pub fn import_file<R: FullRepository + ?Sized>(repo: &R, path: &Path) -> Result<ImportSummary> {
        let export = Self::load_from_file(path)?;
        Self::import(repo, export)
    }

    /// Write an export into `repo`.
    ///
    /// Objects are matched by name, and equipment and locations by their
    /// fields, so importing into a logbook that already knows them reuses the
    /// existing rows. Sessions are matched on date and location. Observations go through
    /// [`create_observation`], so equipment rules and idempotency apply to
    /// imported data as well.
    pub fn import<R: FullRepository + ?Sized>(
        repo: &R,
        export: LogbookExport,
    ) -> Result<ImportSummary> {
        info!(
            "Importing logbook: {} objects, {} sessions",
            export.objects.len(),
            export.sessions.len()
        );
        let mut summary = ImportSummary::default();

        let (telescopes, telescopes_written) = register_section(
            "telescope",
            export.telescopes,
            repo.list_telescopes(),
            |t| repo.store_telescope(t),
        )?;
        let (eyepieces, eyepieces_written) = register_section(
            "eyepiece",
            export.eyepieces,
            repo.list_eyepieces(),
            |e| repo.store_eyepiece(e),
        )?;
        let (barlows, barlows_written) =
            register_section("barlow", export.barlows, repo.list_barlows(), |b| {
                repo.store_barlow(b)
            })?;
        let (cameras, cameras_written) =
            register_section("camera", export.cameras, repo.list_cameras(), |c| {
                repo.store_camera(c)
            })?;
        let (front_filters, front_filters_written) = register_section(
            "front_filter",
            export.front_filters,
            repo.list_front_filters(),
            |f| repo.store_front_filter(f),
        )?;
        let (filters, filters_written) =
            register_section("filter", export.filters, repo.list_filters(), |f| {
                repo.store_filter(f)
            })?;
        let (binoculars, binoculars_written) = register_section(
            "binocular",
            export.binoculars,
            repo.list_binoculars(),
            |b| repo.store_binocular(b),
        )?;
        let equipment = Equipment {
            telescopes,
            eyepieces,
            barlows,
            cameras,
            front_filters,
            filters,
            binoculars,
        };
        summary.equipment = telescopes_written
            + eyepieces_written
            + barlows_written
            + cameras_written
            + front_filters_written
            + filters_written
            + binoculars_written;

        let objects = Self::import_objects(repo, export.objects, &mut summary)?;

        let (locations, locations_written) =
            register_section("location", export.locations, repo.list_locations(), |l| {
                repo.store_location(l)
            })?;
        summary.locations = locations_written;

        for (index, entry) in export.sessions.into_iter().enumerate() {
            Self::import_session(repo, entry, &equipment, &objects, &locations, &mut summary)
                .with_context(|| format!("Failed to import session #{}", index))?;
        }

        info!(
            "Imported {} sessions, {} new observations ({} already present)",
            summary.sessions, summary.observations_created, summary.observations_existing
        );
        Ok(summary)
    }

    fn import_objects<R: FullRepository + ?Sized>(
        repo: &R,
        entries: Vec<ObjectEntry>,
        summary: &mut ImportSummary,
    ) -> Result<HashMap<String, ObjectId>> {
        let mut structures: HashMap<String, StructureId> = HashMap::new();
        let mut objects = HashMap::new();

        for entry in entries {
            if let Some(existing) = repo.find_object_by_name(&entry.name)? {
                debug!("Object '{}' already present", entry.name);
                objects.insert(entry.name, existing.id);
                continue;
            }

            let kind = match &entry.kind {
                Some(name) => Some(repo.get_or_create_kind(name)?.0.id),
                None => None,
            };
            let structure = match &entry.structure {
                Some(name) => match structures.get(name) {
                    Some(id) => Some(*id),
                    None => {
                        let id = repo.store_structure(Structure::new(name.as_str()))?.id;
                        structures.insert(name.clone(), id);
                        Some(id)
                    }
                },
                None => None,
            };

            let object = repo.store_object(Object {
                name: entry.name.clone(),
                favourite: entry.favourite,
                to_be_watched: entry.to_be_watched,
                structure,
                kind,
            })?;
            for alt_name in &entry.alt_names {
                repo.add_alt_name(object.id, alt_name)
                    .with_context(|| format!("Failed to add alternate name '{}'", alt_name))?;
            }
            objects.insert(entry.name, object.id);
            summary.objects += 1;
        }
        Ok(objects)
    }

    fn import_session<R: FullRepository + ?Sized>(
        repo: &R,
        entry: SessionEntry,
        equipment: &Equipment,
        objects: &HashMap<String, ObjectId>,
        locations: &KeyMap<LocationId>,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        let location = locations.get(&entry.location)?;
        let existing = repo
            .sessions_at_location(location)?
            .into_iter()
            .find(|s| s.date == entry.date);
        let session = match existing {
            Some(session) => {
                debug!("Session {} at location {} already present", entry.date, location);
                session
            }
            None => {
                let condition = match entry.condition {
                    Some(condition) => Some(repo.store_condition(condition)?.id),
                    None => None,
                };
                let (session, created) = repo.get_or_create_session(Session {
                    date: entry.date,
                    location,
                    condition,
                    moon_phase: entry.moon_phase,
                    note: entry.note,
                })?;
                if created {
                    summary.sessions += 1;
                }
                session
            }
        };

        for observation in entry.observations {
            let object = *objects
                .get(&observation.object)
                .with_context(|| format!("Unknown object '{}'", observation.object))?;
            let request = equipment.request(&observation)?;
            let (_, created) = create_observation(repo, session.id, object, request)
                .with_context(|| format!("Invalid observation of '{}'", observation.object))?;
            if created {
                summary.observations_created += 1;
            } else {
                summary.observations_existing += 1;
            }
        }
        Ok(())
    }
}

