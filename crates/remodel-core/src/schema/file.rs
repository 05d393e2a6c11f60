//! Schema files
//!
//! Entity types can be declared in TOML:
//!
//! ```toml
//! base_url = "http://example.com"
//!
//! [[entity]]
//! name = "Task"
//! attributes = { name = "string", user_id = "integer", updated_at = "date" }
//! belongs_to = { user = "User" }
//!
//! [entity.wrapper]
//! fields = { id = "id", user_id = "user_id", name = "name" }
//! relations = ["user"]
//! ```
//!
//! Table order is kept, so the field map stays in declaration order.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use super::{EntityDef, Schema, Wrapper};
use crate::error::SchemaError;
use crate::value::AttrKind;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default, rename = "entity")]
    entities: Vec<EntityFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityFile {
    name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    sync_stamp: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    attributes: IndexMap<String, AttrKind>,
    #[serde(default)]
    belongs_to: IndexMap<String, String>,
    #[serde(default)]
    has_many: IndexMap<String, String>,
    #[serde(default)]
    wrapper: Option<WrapperFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WrapperFile {
    #[serde(default)]
    fields: IndexMap<String, String>,
    #[serde(default)]
    relations: Vec<String>,
}

impl EntityFile {
    fn into_def(self) -> EntityDef {
        let mut def = EntityDef::new(self.name);
        if let Some(location) = self.location {
            def = def.location(location);
        }
        for (name, kind) in self.attributes {
            def = def.attribute(name, kind);
        }
        for (name, target) in self.belongs_to {
            def = def.belongs_to(name, target);
        }
        for (name, target) in self.has_many {
            def = def.has_many(name, target);
        }
        if let Some(stamp) = self.sync_stamp {
            def = def.sync_stamp(stamp);
        }
        if let Some(updated_at) = self.updated_at {
            def = def.updated_at(updated_at);
        }
        if let Some(wrapper) = self.wrapper {
            let mut built = Wrapper::new();
            for (remote, local) in wrapper.fields {
                built = built.field(remote, local);
            }
            for relation in wrapper.relations {
                built = built.relation(relation);
            }
            def = def.wrapper(built);
        }
        def
    }
}

impl Schema {
    /// Build a schema from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = toml::from_str(content)?;

        let mut builder = Schema::builder();
        if let Some(base_url) = file.base_url {
            builder = builder.base_url(base_url);
        }
        for entity in file.entities {
            builder = builder.entity(entity.into_def());
        }
        builder.build()
    }

    /// Load a schema file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load schema file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Cardinality;
    use std::io::Write;

    const SCHEMA: &str = r#"
        base_url = "http://example.com"

        [[entity]]
        name = "User"
        sync_stamp = "last_sync_at"
        attributes = { name = "string", email = "string", age = "integer", admin = "boolean", plan_id = "integer" }
        belongs_to = { plan = "Plan" }
        has_many = { tasks = "Task" }

        [entity.wrapper]
        fields = { id = "id", plan_id = "plan_id", name = "name", email = "email", age = "age", admin = "admin" }
        relations = ["tasks", "plan"]

        [[entity]]
        name = "Task"
        location = "http://example.com/tasks"
        attributes = { name = "string", user_id = "integer", due_date = "time", updated_at = "date" }
        belongs_to = { user = "User" }

        [entity.wrapper]
        fields = { id = "id", user_id = "user_id", name = "name" }
        relations = ["user"]

        [[entity]]
        name = "Plan"
        attributes = { name = "string" }
        has_many = { users = "User" }
    "#;

    #[test]
    fn test_from_toml_str() {
        let schema = Schema::from_toml_str(SCHEMA).unwrap();
        let user = schema.lookup("User").unwrap();
        let task = schema.lookup("Task").unwrap();
        let plan = schema.lookup("Plan").unwrap();

        let user_type = schema.entity(user);
        assert_eq!(user_type.sync_stamp(), Some("last_sync_at"));
        assert_eq!(
            user_type.association("tasks").map(|a| a.cardinality),
            Some(Cardinality::ToMany)
        );

        // Field map keeps file order
        let remote: Vec<&str> = schema.wrapper(user).unwrap().fields().map(|(r, _)| r).collect();
        assert_eq!(remote, vec!["id", "plan_id", "name", "email", "age", "admin"]);

        assert_eq!(schema.entity(task).updated_attribute(), Some("updated_at"));
        assert_eq!(
            schema.location(user),
            Some("http://example.com/users".to_string())
        );
        assert!(schema.wrapper(plan).is_err());
    }

    #[test]
    fn test_invalid_kind() {
        let result = Schema::from_toml_str(
            r#"
            [[entity]]
            name = "Task"
            attributes = { name = "varchar" }
            "#,
        );
        assert!(matches!(result, Err(SchemaError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();

        let schema = Schema::load(file.path()).unwrap();
        assert_eq!(schema.entities().count(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Schema::load(Path::new("/nonexistent/schema.toml"));
        assert!(result.is_err());
    }
}
