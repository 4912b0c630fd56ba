//! Sky objects and their classification.

use serde::{Deserialize, Serialize};

crate::define_id_type!(
    /// Sky object row identifier.
    ObjectId
);
crate::define_id_type!(
    /// Alternate-name row identifier.
    AltNameId
);
crate::define_id_type!(
    /// Structure row identifier.
    StructureId
);
crate::define_id_type!(
    /// Kind row identifier.
    KindId
);

/// A sky object that can be observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    #[serde(default)]
    pub favourite: bool,
    /// Set while the object sits on the watch-list; cleared by the first
    /// recorded observation.
    #[serde(default)]
    pub to_be_watched: bool,
    #[serde(default)]
    pub structure: Option<StructureId>,
    #[serde(default)]
    pub kind: Option<KindId>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            favourite: false,
            to_be_watched: false,
            structure: None,
            kind: None,
        }
    }

    pub fn watched(mut self) -> Self {
        self.to_be_watched = true;
        self
    }

    pub fn in_structure(mut self, structure: StructureId) -> Self {
        self.structure = Some(structure);
        self
    }

    pub fn of_kind(mut self, kind: KindId) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Alternate designation of an object, e.g. "M42" for the Orion Nebula.
/// Names are unique across all objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltName {
    pub object: ObjectId,
    pub name: String,
}

/// A named grouping of objects, such as a constellation or a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
}

impl Structure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Object classification ("Galaxy", "Double star", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kind {
    pub name: String,
}

impl Kind {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

crate::impl_entity!(Object, ObjectId, "object");
crate::impl_entity!(AltName, AltNameId, "alt_name");
crate::impl_entity!(Structure, StructureId, "structure");
crate::impl_entity!(Kind, KindId, "kind");
