//! Entity types
//!
//! An [`EntityDef`] is what callers declare; registration resolves it into an
//! [`EntityType`] whose associations point at typed [`EntityId`] handles.

use std::fmt;

use indexmap::IndexMap;

use super::wrapper::Wrapper;
use crate::naming;
use crate::value::AttrKind;

/// Name of the identity attribute every entity type carries
pub const ID_ATTRIBUTE: &str = "id";

/// Default name of the "last updated" attribute
pub const UPDATED_AT: &str = "updated_at";

/// Handle to a registered entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// To-one or to-many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::ToOne => write!(f, "to-one"),
            Cardinality::ToMany => write!(f, "to-many"),
        }
    }
}

/// A resolved association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub name: String,
    pub target: EntityId,
    pub cardinality: Cardinality,
}

/// Declaration of an entity type, before registration
#[derive(Debug, Clone)]
pub struct EntityDef {
    pub(crate) name: String,
    pub(crate) location: Option<String>,
    pub(crate) attributes: IndexMap<String, AttrKind>,
    pub(crate) associations: Vec<(String, String, Cardinality)>,
    pub(crate) sync_stamp: Option<String>,
    pub(crate) updated_at: Option<String>,
    pub(crate) wrapper: Option<Wrapper>,
}

impl EntityDef {
    /// Declare an entity type; `id` is declared implicitly
    pub fn new(name: impl Into<String>) -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert(ID_ATTRIBUTE.to_string(), AttrKind::Integer);
        Self {
            name: name.into(),
            location: None,
            attributes,
            associations: Vec::new(),
            sync_stamp: None,
            updated_at: None,
            wrapper: None,
        }
    }

    /// Collection location (e.g. `http://example.com/tasks`)
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, kind: AttrKind) -> Self {
        self.attributes.insert(name.into(), kind);
        self
    }

    /// To-one association named `name` targeting the type named `target`
    pub fn belongs_to(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.associations
            .push((name.into(), target.into(), Cardinality::ToOne));
        self
    }

    /// To-many association named `name` targeting the type named `target`
    pub fn has_many(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.associations
            .push((name.into(), target.into(), Cardinality::ToMany));
        self
    }

    /// Attribute stamped whenever a record is wrapped from remote data
    ///
    /// Declared as a `time` attribute if not declared already.
    pub fn sync_stamp(mut self, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        self.attributes
            .entry(attribute.clone())
            .or_insert(AttrKind::Time);
        self.sync_stamp = Some(attribute);
        self
    }

    /// Attribute used by `last_update` (defaults to `updated_at` when declared)
    pub fn updated_at(mut self, attribute: impl Into<String>) -> Self {
        self.updated_at = Some(attribute.into());
        self
    }

    pub fn wrapper(mut self, wrapper: Wrapper) -> Self {
        self.wrapper = Some(wrapper);
        self
    }
}

/// A registered entity type
#[derive(Debug, Clone)]
pub struct EntityType {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) canonical: String,
    pub(crate) plural: String,
    pub(crate) location: Option<String>,
    pub(crate) attributes: IndexMap<String, AttrKind>,
    pub(crate) associations: IndexMap<String, Association>,
    pub(crate) sync_stamp: Option<String>,
    pub(crate) updated_at: Option<String>,
    pub(crate) wrapper: Option<Wrapper>,
}

impl EntityType {
    pub(crate) fn from_def(id: EntityId, def: EntityDef) -> Self {
        let canonical = naming::underscore(&def.name);
        let plural = naming::pluralize(&canonical);
        let updated_at = def.updated_at.or_else(|| {
            def.attributes
                .contains_key(UPDATED_AT)
                .then(|| UPDATED_AT.to_string())
        });

        Self {
            id,
            name: def.name,
            canonical,
            plural,
            location: def.location,
            attributes: def.attributes,
            associations: IndexMap::new(),
            sync_stamp: def.sync_stamp,
            updated_at,
            wrapper: def.wrapper,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Declared type name (e.g. `Task`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Singular payload key (e.g. `task`)
    pub fn canonical_name(&self) -> &str {
        &self.canonical
    }

    /// Plural payload key and default path segment (e.g. `tasks`)
    pub fn plural_name(&self) -> &str {
        &self.plural
    }

    /// Explicitly declared collection location
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Attributes with their kinds, `id` first
    pub fn attributes(&self) -> impl Iterator<Item = (&str, AttrKind)> {
        self.attributes.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn attribute_kind(&self, name: &str) -> Option<AttrKind> {
        self.attributes.get(name).copied()
    }

    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.values()
    }

    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    pub fn sync_stamp(&self) -> Option<&str> {
        self.sync_stamp.as_deref()
    }

    pub fn updated_attribute(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    pub fn wrapper(&self) -> Option<&Wrapper> {
        self.wrapper.as_ref()
    }
}
