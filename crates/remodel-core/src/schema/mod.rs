//! Schema registry
//!
//! The [`Schema`] owns every entity type together with its wrapper
//! configuration. It is built once, validated at registration, and then
//! handed to the sync orchestrator; nothing looks entity types up from
//! global state.
//!
//! ## Usage
//!
//! ```ignore
//! let schema = Schema::builder()
//!     .entity(
//!         EntityDef::new("Task")
//!             .location("http://example.com/tasks")
//!             .attribute("name", AttrKind::String)
//!             .belongs_to("user", "User")
//!             .wrapper(Wrapper::new().field("id", "id").field("name", "name").relation("user")),
//!     )
//!     .entity(EntityDef::new("User").attribute("name", AttrKind::String))
//!     .build()?;
//! ```

mod entity;
mod file;
mod wrapper;

use std::collections::HashMap;

use indexmap::IndexMap;

pub use entity::{
    Association, Cardinality, EntityDef, EntityId, EntityType, ID_ATTRIBUTE, UPDATED_AT,
};
pub use wrapper::Wrapper;

use crate::error::{SchemaError, WrapperError, WrapperResult};

/// Registry of entity types
#[derive(Debug, Clone)]
pub struct Schema {
    entities: Vec<EntityType>,
    by_name: HashMap<String, EntityId>,
    base_url: Option<String>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Get a registered entity type
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this schema.
    pub fn entity(&self, id: EntityId) -> &EntityType {
        &self.entities[id.0]
    }

    /// Find an entity type handle by its declared name
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    /// All entity types, in registration order
    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.iter()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Use `base_url` for default locations unless the schema declares one
    pub fn with_default_base_url(mut self, base_url: Option<String>) -> Self {
        if self.base_url.is_none() {
            self.base_url = base_url;
        }
        self
    }

    /// Wrapper configuration of an entity type
    pub fn wrapper(&self, id: EntityId) -> WrapperResult<&Wrapper> {
        let entity = self.entity(id);
        entity
            .wrapper()
            .ok_or_else(|| WrapperError::WrapperNotDefined {
                entity: entity.name().to_string(),
            })
    }

    /// Collection location: the declared one, else `<base_url>/<plural>`
    pub fn location(&self, id: EntityId) -> Option<String> {
        let entity = self.entity(id);
        if let Some(location) = entity.location() {
            return Some(location.to_string());
        }
        self.base_url.as_ref().map(|base| {
            format!("{}/{}", base.trim_end_matches('/'), entity.plural_name())
        })
    }

    /// Collection location, or `UrlNotDefined`
    pub fn require_location(&self, id: EntityId) -> WrapperResult<String> {
        self.location(id).ok_or_else(|| WrapperError::UrlNotDefined {
            entity: self.entity(id).name().to_string(),
        })
    }
}

/// Collects entity declarations and resolves them into a [`Schema`]
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    base_url: Option<String>,
    defs: Vec<EntityDef>,
}

impl SchemaBuilder {
    /// Base URL for entity types without an explicit location
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn entity(mut self, def: EntityDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Validate declarations and resolve association targets
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut by_name = HashMap::new();
        for (index, def) in self.defs.iter().enumerate() {
            if by_name.insert(def.name.clone(), EntityId(index)).is_some() {
                return Err(SchemaError::DuplicateEntity {
                    name: def.name.clone(),
                });
            }
        }

        let mut entities = Vec::with_capacity(self.defs.len());
        for (index, def) in self.defs.into_iter().enumerate() {
            let mut associations = IndexMap::new();
            for (name, target, cardinality) in &def.associations {
                let Some(&target_id) = by_name.get(target) else {
                    return Err(SchemaError::UnknownTarget {
                        entity: def.name.clone(),
                        association: name.clone(),
                        target: target.clone(),
                    });
                };
                let association = Association {
                    name: name.clone(),
                    target: target_id,
                    cardinality: *cardinality,
                };
                if associations.insert(name.clone(), association).is_some() {
                    return Err(SchemaError::DuplicateAssociation {
                        entity: def.name.clone(),
                        association: name.clone(),
                    });
                }
            }

            if let Some(wrapper) = &def.wrapper {
                wrapper.validate(&def.name)?;
                if let Some(relation) = wrapper
                    .relations()
                    .iter()
                    .find(|relation| !associations.contains_key(relation.as_str()))
                {
                    return Err(SchemaError::UndeclaredRelation {
                        entity: def.name.clone(),
                        relation: relation.clone(),
                    });
                }
            }

            let mut entity = EntityType::from_def(EntityId(index), def);
            entity.associations = associations;
            entities.push(entity);
        }

        Ok(Schema {
            entities,
            by_name,
            base_url: self.base_url,
        })
    }
}
