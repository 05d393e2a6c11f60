//! Records
//!
//! A [`Record`] is an instance of an entity type: scalar attribute values,
//! the remote identity, and references to associated records by
//! [`RecordKey`].

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::schema::{EntityId, ID_ATTRIBUTE};
use crate::value::Scalar;

/// Store-assigned local key of a record
///
/// Distinct from the remote identity (`id`), which is assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub(crate) entity: EntityId,
    pub(crate) local: u64,
}

impl RecordKey {
    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity, self.local)
    }
}

/// An instance of an entity type
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity: EntityId,
    key: Option<RecordKey>,
    id: Option<i64>,
    values: IndexMap<String, Scalar>,
    to_one: HashMap<String, RecordKey>,
    to_many: HashMap<String, Vec<RecordKey>>,
    location: Option<String>,
}

impl Record {
    /// Create a new, unsaved record
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            key: None,
            id: None,
            values: IndexMap::new(),
            to_one: HashMap::new(),
            to_many: HashMap::new(),
            location: None,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Local key, set once the record has been saved to the store
    pub fn key(&self) -> Option<RecordKey> {
        self.key
    }

    pub(crate) fn assign_key(&mut self, key: RecordKey) {
        self.key = Some(key);
    }

    /// Whether the record has never been saved to the store
    pub fn is_new(&self) -> bool {
        self.key.is_none()
    }

    /// Remote identity
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    /// Value of an attribute, `id` included
    pub fn value(&self, attribute: &str) -> Option<Scalar> {
        if attribute == ID_ATTRIBUTE {
            return self.id.map(Scalar::Int);
        }
        self.values.get(attribute).cloned()
    }

    /// Set an attribute; `id` accepts integers, numeric strings or null
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Scalar>) {
        let attribute = attribute.into();
        let value = value.into();
        if attribute == ID_ATTRIBUTE {
            self.id = value.as_identity();
            return;
        }
        self.values.insert(attribute, value);
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Attribute values that have been set (`id` excluded)
    pub fn values(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Record referenced by a to-one association
    pub fn to_one(&self, association: &str) -> Option<RecordKey> {
        self.to_one.get(association).copied()
    }

    pub fn set_to_one(&mut self, association: impl Into<String>, key: Option<RecordKey>) {
        let association = association.into();
        match key {
            Some(key) => {
                self.to_one.insert(association, key);
            }
            None => {
                self.to_one.remove(&association);
            }
        }
    }

    /// Records in a to-many association, in assignment order
    pub fn to_many(&self, association: &str) -> &[RecordKey] {
        self.to_many
            .get(association)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_to_many(&mut self, association: impl Into<String>, keys: Vec<RecordKey>) {
        self.to_many.insert(association.into(), keys);
    }

    /// Record-specific location overriding the collection location
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
    }
}
