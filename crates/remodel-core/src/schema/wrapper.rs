//! Wrapper configuration
//!
//! Per entity type: which remote JSON keys map to which local attributes,
//! and which associations are resolved recursively on inbound payloads.

use std::collections::HashSet;

use crate::error::SchemaError;

/// Field map and relation list for one entity type
///
/// Immutable once registered with a [`Schema`](super::Schema).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrapper {
    fields: Vec<(String, String)>,
    relations: Vec<String>,
}

impl Wrapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the remote JSON key `remote` onto the local attribute `local`
    pub fn field(mut self, remote: impl Into<String>, local: impl Into<String>) -> Self {
        self.fields.push((remote.into(), local.into()));
        self
    }

    /// Resolve the association `name` on inbound payloads
    pub fn relation(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.relations.contains(&name) {
            self.relations.push(name);
        }
        self
    }

    /// Field map entries as `(remote, local)` pairs, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(r, l)| (r.as_str(), l.as_str()))
    }

    /// Relation names, in declaration order
    pub fn relations(&self) -> &[String] {
        &self.relations
    }

    /// Remote key whose local side is `attribute`
    pub fn remote_key_for(&self, attribute: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, local)| local == attribute)
            .map(|(remote, _)| remote.as_str())
    }

    /// Check that keys are unique on each side of the field map
    pub(crate) fn validate(&self, entity: &str) -> Result<(), SchemaError> {
        let mut remote_seen = HashSet::new();
        let mut local_seen = HashSet::new();

        for (remote, local) in &self.fields {
            if !remote_seen.insert(remote.as_str()) {
                return Err(SchemaError::DuplicateField {
                    entity: entity.to_string(),
                    key: remote.clone(),
                });
            }
            if !local_seen.insert(local.as_str()) {
                return Err(SchemaError::DuplicateField {
                    entity: entity.to_string(),
                    key: local.clone(),
                });
            }
        }

        Ok(())
    }
}
