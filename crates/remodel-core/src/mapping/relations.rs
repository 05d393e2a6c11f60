//! Relation resolver
//!
//! Inbound, every relation named in the wrapper is looked up in the payload
//! and its nested objects are upserted against the association's target
//! type. Outbound, associated records are nested into the payload.

use serde_json::{Map, Value};
use tracing::warn;

use super::{fields, Mapper};
use crate::error::WrapperResult;
use crate::outcome::RelationIssue;
use crate::record::{Record, RecordKey};
use crate::schema::{Cardinality, EntityId, EntityType, Schema, Wrapper};
use crate::store::MemoryStore;

/// Whether a relation value carries anything to resolve
///
/// `null`, `false`, blank strings and empty containers are skipped.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(object) => !object.is_empty(),
        Value::Number(_) => true,
    }
}

impl Mapper<'_> {
    pub(super) fn resolve_relations(
        &mut self,
        entity: &EntityType,
        wrapper: &Wrapper,
        record: &mut Record,
        json: &Value,
    ) {
        let Some(object) = json.as_object() else {
            return;
        };

        for relation in wrapper.relations() {
            let Some(value) = object.get(relation.as_str()).filter(|v| is_present(v)) else {
                continue;
            };
            // Checked when the schema was built
            let Some(association) = entity.association(relation) else {
                continue;
            };

            match (value, association.cardinality) {
                (Value::Array(items), Cardinality::ToMany) => {
                    let keys = items
                        .iter()
                        .enumerate()
                        .filter_map(|(index, item)| {
                            self.upsert(relation, association.target, item, Some(index))
                        })
                        .collect();
                    record.set_to_many(relation.as_str(), keys);
                }
                (Value::Object(_), Cardinality::ToOne) => {
                    if let Some(key) = self.upsert(relation, association.target, value, None) {
                        record.set_to_one(relation.as_str(), Some(key));
                    }
                }
                (Value::Array(items), cardinality) => {
                    // Elements are still stored, there is just nowhere to attach them
                    for (index, item) in items.iter().enumerate() {
                        self.upsert(relation, association.target, item, Some(index));
                    }
                    self.unassignable(relation, cardinality);
                }
                (Value::Object(_), cardinality) => {
                    self.upsert(relation, association.target, value, None);
                    self.unassignable(relation, cardinality);
                }
                (_, cardinality) => self.unassignable(relation, cardinality),
            }
        }
    }

    /// Save one nested element, recording an issue if it cannot be
    fn upsert(
        &mut self,
        relation: &str,
        target: EntityId,
        item: &Value,
        index: Option<usize>,
    ) -> Option<RecordKey> {
        let reason = match self.save_model_with(target, item) {
            Ok(Some(record)) => return record.key(),
            Ok(None) => "not a JSON object".to_string(),
            Err(e) => e.to_string(),
        };

        let issue = RelationIssue::ElementSkipped {
            relation: relation.to_string(),
            index,
            reason,
        };
        warn!("Relation not fully resolved: {}", issue);
        self.issues.push(issue);
        None
    }

    fn unassignable(&mut self, relation: &str, cardinality: Cardinality) {
        let issue = RelationIssue::Unassignable {
            relation: relation.to_string(),
            cardinality,
        };
        warn!("Relation not fully resolved: {}", issue);
        self.issues.push(issue);
    }
}

/// Build the request payload for a record
///
/// The result is `{"<canonical name>": body}`. The body holds the mapped
/// scalar fields plus every associated record: to-one under the target's
/// canonical name, to-many as an array under its plural name. A record
/// already being serialized higher up the chain is not nested again.
pub fn build_payload(schema: &Schema, store: &MemoryStore, record: &Record) -> WrapperResult<Value> {
    let entity = schema.entity(record.entity());
    let mut path = Vec::new();
    let body = build_body(schema, store, record, &mut path)?;

    let mut payload = Map::new();
    payload.insert(entity.canonical_name().to_string(), Value::Object(body));
    Ok(Value::Object(payload))
}

fn build_body(
    schema: &Schema,
    store: &MemoryStore,
    record: &Record,
    path: &mut Vec<RecordKey>,
) -> WrapperResult<Map<String, Value>> {
    let entity = schema.entity(record.entity());
    let wrapper = schema.wrapper(record.entity())?;
    let mut body = fields::build_outbound(entity, wrapper, record);

    let key = record.key();
    if let Some(key) = key {
        path.push(key);
    }

    for association in entity.associations() {
        let target = schema.entity(association.target);
        match association.cardinality {
            Cardinality::ToMany => {
                let mut members = Vec::new();
                for key in record.to_many(&association.name) {
                    if path.contains(key) {
                        continue;
                    }
                    if let Some(member) = store.get(*key) {
                        members.push(Value::Object(build_body(schema, store, member, path)?));
                    }
                }
                body.insert(target.plural_name().to_string(), Value::Array(members));
            }
            Cardinality::ToOne => {
                let member = record
                    .to_one(&association.name)
                    .filter(|key| !path.contains(key))
                    .and_then(|key| store.get(key));
                if let Some(member) = member {
                    let nested = build_body(schema, store, member, path)?;
                    body.insert(target.canonical_name().to_string(), Value::Object(nested));
                }
            }
        }
    }

    if key.is_some() {
        path.pop();
    }
    Ok(body)
}
