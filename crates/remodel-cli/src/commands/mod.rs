//! Command handlers

pub mod create;
pub mod delete;
pub mod fetch;
pub mod schema;

use anyhow::{bail, Result};

use remodel_core::{EntityId, Schema};

/// Look up an entity type by name
pub(crate) fn resolve_entity(schema: &Schema, name: &str) -> Result<EntityId> {
    if let Some(entity) = schema.lookup(name) {
        return Ok(entity);
    }
    let known: Vec<&str> = schema.entities().map(|entity| entity.name()).collect();
    bail!(
        "Unknown entity type '{}'. Known types: {}",
        name,
        known.join(", ")
    )
}
