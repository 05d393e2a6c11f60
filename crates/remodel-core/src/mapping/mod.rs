//! Mapping between remote JSON and local records
//!
//! ## Inbound
//!
//! `wrap` stamps the record, copies scalar fields ([`fields`]) and then
//! resolves every relation named in the wrapper ([`relations`]). Each nested
//! object is upserted against its own entity type: found by `id` and updated
//! in place, or created.
//!
//! ## Outbound
//!
//! [`build_payload`] turns a record into `{"<canonical name>": {...}}`,
//! nesting associated records under their type's singular or plural name.

pub mod fields;
pub mod relations;

use serde_json::Value;
use tracing::debug;

pub use relations::build_payload;

use crate::error::WrapperResult;
use crate::outcome::{Models, RelationIssue};
use crate::record::Record;
use crate::schema::{EntityId, Schema, ID_ATTRIBUTE};
use crate::stamp;
use crate::store::MemoryStore;
use crate::value::identity_of;

/// Inbound mapping context for one operation
///
/// Relation problems met along the way are collected rather than raised;
/// take them with [`into_issues`](Self::into_issues) when done.
pub struct Mapper<'a> {
    schema: &'a Schema,
    store: &'a mut MemoryStore,
    issues: Vec<RelationIssue>,
}

impl<'a> Mapper<'a> {
    pub fn new(schema: &'a Schema, store: &'a mut MemoryStore) -> Self {
        Self {
            schema,
            store,
            issues: Vec::new(),
        }
    }

    /// Apply `json` onto `record`
    ///
    /// The sync stamp is set before anything else, so it stays applied even
    /// when a later step fails.
    pub fn wrap(&mut self, record: &mut Record, json: &Value) -> WrapperResult<()> {
        let schema = self.schema;
        let entity = schema.entity(record.entity());
        let wrapper = schema.wrapper(record.entity())?;

        stamp::touch_sync(record, entity);
        fields::apply_inbound(entity, wrapper, record, json)?;
        self.resolve_relations(entity, wrapper, record, json);

        Ok(())
    }

    /// Find the record with `json["id"]` or start a new one, then wrap it
    ///
    /// Returns `None` for anything but a JSON object. The record is not saved.
    pub fn build_model(&mut self, entity: EntityId, json: &Value) -> WrapperResult<Option<Record>> {
        if !json.is_object() {
            return Ok(None);
        }

        let existing = json
            .get(ID_ATTRIBUTE)
            .and_then(identity_of)
            .and_then(|id| self.store.find_by_id(entity, id))
            .cloned();

        let mut record = match existing {
            Some(record) => record,
            None => {
                debug!(
                    "Building new {} record",
                    self.schema.entity(entity).name()
                );
                Record::new(entity)
            }
        };

        self.wrap(&mut record, json)?;
        Ok(Some(record))
    }

    /// [`build_model`](Self::build_model), then save the record to the store
    pub fn save_model_with(
        &mut self,
        entity: EntityId,
        json: &Value,
    ) -> WrapperResult<Option<Record>> {
        let Some(mut record) = self.build_model(entity, json)? else {
            return Ok(None);
        };
        self.store.save(&mut record);
        Ok(Some(record))
    }

    /// Upsert an object or every object of an array
    ///
    /// For arrays, the result holds the stored records whose ids came back,
    /// in store order. For an object, the stored copy of the one record.
    pub fn update_models(&mut self, entity: EntityId, json: &Value) -> WrapperResult<Option<Models>> {
        if let Value::Array(items) = json {
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                match self.save_model_with(entity, item)? {
                    Some(record) => ids.extend(record.id()),
                    None => debug!("Skipping array element that is not an object"),
                }
            }
            let records = self
                .store
                .where_id_in(entity, &ids)
                .into_iter()
                .cloned()
                .collect();
            return Ok(Some(Models::Many(records)));
        }

        let Some(record) = self.save_model_with(entity, json)? else {
            return Ok(None);
        };
        Ok(record
            .key()
            .and_then(|key| self.store.get(key))
            .cloned()
            .map(Models::One))
    }

    pub fn issues(&self) -> &[RelationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<RelationIssue> {
        self.issues
    }
}
