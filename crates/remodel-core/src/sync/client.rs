//! Sync orchestrator
//!
//! [`Syncer`] owns the local store and drives fetch, save and destroy
//! against a [`Transport`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::action::{self, SaveAction};
use super::response::{is_record, read_json};
use crate::error::WrapperResult;
use crate::mapping::{build_payload, Mapper};
use crate::outcome::{EmptyReason, Models, Outcome, RelationIssue};
use crate::record::Record;
use crate::schema::{EntityId, Schema};
use crate::stamp;
use crate::store::MemoryStore;
use crate::transport::{query_pairs, Request, Transport};

/// Options for [`Syncer::save`]
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Merged into the top level of the payload; these win on collision
    pub params: Option<Value>,
}

/// Options for [`Syncer::destroy`]
#[derive(Debug, Clone, Default)]
pub struct DestroyOptions {
    /// JSON body sent with the DELETE
    pub params: Option<Value>,
    /// Remove the local record whatever the response
    pub force: bool,
}

/// Result of [`Syncer::save`]
#[derive(Debug, Clone, PartialEq)]
pub struct Saved {
    pub outcome: Outcome<Record>,
    /// Parsed response body, when there was one
    pub response: Option<Value>,
}

/// Result of [`Syncer::destroy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destroyed {
    /// Whether the local record was deleted
    pub removed: bool,
    /// Response status, `None` if the request failed outright
    pub status: Option<u16>,
}

impl Destroyed {
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|status| (200..300).contains(&status))
    }
}

/// Synchronizes a local store with a remote JSON resource
pub struct Syncer<T> {
    schema: Arc<Schema>,
    transport: T,
    store: MemoryStore,
}

impl<T: Transport> Syncer<T> {
    pub fn new(schema: impl Into<Arc<Schema>>, transport: T) -> Self {
        Self {
            schema: schema.into(),
            transport,
            store: MemoryStore::new(),
        }
    }

    /// Start from an existing store
    pub fn with_store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MemoryStore {
        &mut self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_store(self) -> MemoryStore {
        self.store
    }

    // ==================== Local operations ====================

    /// Newest "updated" timestamp among stored records of a type
    pub fn last_update(&self, entity: EntityId) -> Option<DateTime<Utc>> {
        stamp::last_update(&self.store, self.schema.entity(entity))
    }

    /// Set the record's sync stamp to now
    pub fn touch_sync(&self, record: &mut Record) -> Option<DateTime<Utc>> {
        stamp::touch_sync(record, self.schema.entity(record.entity()))
    }

    /// Apply JSON onto a record, returning the relation issues met
    pub fn wrap(&mut self, record: &mut Record, json: &Value) -> WrapperResult<Vec<RelationIssue>> {
        let mut mapper = Mapper::new(&self.schema, &mut self.store);
        mapper.wrap(record, json)?;
        Ok(mapper.into_issues())
    }

    /// Find by `json["id"]` or create, then wrap; the record is not saved
    pub fn build_model(&mut self, entity: EntityId, json: &Value) -> WrapperResult<Outcome<Record>> {
        let mut mapper = Mapper::new(&self.schema, &mut self.store);
        let record = mapper.build_model(entity, json)?;
        Ok(into_outcome(record, mapper.into_issues()))
    }

    /// [`build_model`](Self::build_model), then save to the store
    pub fn save_model_with(
        &mut self,
        entity: EntityId,
        json: &Value,
    ) -> WrapperResult<Outcome<Record>> {
        let mut mapper = Mapper::new(&self.schema, &mut self.store);
        let record = mapper.save_model_with(entity, json)?;
        Ok(into_outcome(record, mapper.into_issues()))
    }

    /// Upsert an object or an array of objects
    pub fn update_models(&mut self, entity: EntityId, json: &Value) -> WrapperResult<Outcome<Models>> {
        let mut mapper = Mapper::new(&self.schema, &mut self.store);
        let models = mapper.update_models(entity, json)?;
        Ok(into_outcome(models, mapper.into_issues()))
    }

    // ==================== Remote operations ====================

    /// GET a collection or a single resource and upsert what comes back
    ///
    /// `location` defaults to the entity type's collection location; `params`
    /// (a JSON object) become query parameters.
    pub async fn fetch(
        &mut self,
        entity: EntityId,
        location: Option<&str>,
        params: &Value,
    ) -> WrapperResult<Outcome<Models>> {
        let schema = Arc::clone(&self.schema);
        schema.wrapper(entity)?;
        let url = match location {
            Some(location) => location.to_string(),
            None => schema.require_location(entity)?,
        };

        let name = schema.entity(entity).name();
        debug!("Fetching {} from {}", name, url);
        let request = Request::get(url.as_str()).with_query(query_pairs(params));
        let json = match read_json(&url, self.transport.send(request).await) {
            Ok(json) => json,
            Err(reason) => return Ok(Outcome::Empty(reason)),
        };

        let outcome = self.update_models(entity, &json)?;
        if let Some(models) = outcome.value() {
            info!("Fetched {} {} record(s)", models.len(), name);
        }
        Ok(outcome)
    }

    /// GET one record (its member location unless `location` is given) and
    /// apply the response to it
    pub async fn fetch_one(
        &mut self,
        record: &mut Record,
        location: Option<&str>,
        params: &Value,
    ) -> WrapperResult<Outcome<Record>> {
        self.schema.wrapper(record.entity())?;
        let url = match location {
            Some(location) => location.to_string(),
            None => action::member_location(&self.schema, record)?,
        };

        debug!("Fetching {} from {}", self.schema.entity(record.entity()).name(), url);
        let request = Request::get(url.as_str()).with_query(query_pairs(params));
        let json = match read_json(&url, self.transport.send(request).await) {
            Ok(json) if json.is_object() => json,
            Ok(_) => return Ok(Outcome::Empty(EmptyReason::NothingToApply)),
            Err(reason) => return Ok(Outcome::Empty(reason)),
        };

        let issues = self.wrap(record, &json)?;
        self.store.save(record);
        Ok(Outcome::with_issues(record.clone(), issues))
    }

    /// Create or update the record remotely, then apply the response and
    /// save it locally
    ///
    /// Configuration problems and an invalid record state fail before any
    /// request is sent.
    pub async fn save(&mut self, record: &mut Record, options: SaveOptions) -> WrapperResult<Saved> {
        let schema = Arc::clone(&self.schema);
        let entity = schema.entity(record.entity());

        schema.require_location(record.entity())?;
        let save_action = action::save_action(&schema, record)?;
        if save_action == SaveAction::Create {
            if let Some(id) = record.id() {
                warn!("Clearing id {} of new {} record before create", id, entity.name());
                record.set_id(None);
            }
        }
        let url = action::save_location(&schema, record, save_action)?;

        let mut payload = build_payload(&schema, &self.store, record)?;
        if let Some(params) = options.params {
            merge_params(&mut payload, params);
        }

        debug!("{} {} to {}", save_action.method(), entity.name(), url);
        let request = Request::new(save_action.method(), url.as_str()).with_body(Some(payload));
        let json = match read_json(&url, self.transport.send(request).await) {
            Ok(json) => json,
            Err(reason) => {
                return Ok(Saved {
                    outcome: Outcome::Empty(reason),
                    response: None,
                })
            }
        };
        if !is_record(&json) {
            warn!("Response from {} held nothing to apply", url);
            return Ok(Saved {
                outcome: Outcome::Empty(EmptyReason::NothingToApply),
                response: Some(json),
            });
        }

        let issues = self.wrap(record, &json)?;
        self.store.save(record);
        info!("Saved {} record {:?}", entity.name(), record.id());

        Ok(Saved {
            outcome: Outcome::with_issues(record.clone(), issues),
            response: Some(json),
        })
    }

    /// DELETE the record remotely and remove it locally on success, or
    /// always when `force` is set
    pub async fn destroy(
        &mut self,
        record: &Record,
        options: DestroyOptions,
    ) -> WrapperResult<Destroyed> {
        let url = action::member_location(&self.schema, record)?;
        let name = self.schema.entity(record.entity()).name();

        debug!("DELETE {} at {}", name, url);
        let request = Request::delete(url.as_str()).with_body(options.params);
        let status = match self.transport.send(request).await {
            Ok(response) => Some(response.status),
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                None
            }
        };

        let mut destroyed = Destroyed {
            removed: false,
            status,
        };
        if destroyed.is_success() || options.force {
            destroyed.removed = record
                .key()
                .and_then(|key| self.store.delete(key))
                .is_some();
        } else {
            warn!("Keeping local {} record, delete was not confirmed", name);
        }

        info!("Destroyed {} at {} (removed locally: {})", name, url, destroyed.removed);
        Ok(destroyed)
    }

    /// [`destroy`](Self::destroy) with `force` set
    pub async fn destroy_force(&mut self, record: &Record) -> WrapperResult<Destroyed> {
        let options = DestroyOptions {
            params: None,
            force: true,
        };
        self.destroy(record, options).await
    }
}

fn into_outcome<T>(value: Option<T>, issues: Vec<RelationIssue>) -> Outcome<T> {
    match value {
        Some(value) => Outcome::with_issues(value, issues),
        None => Outcome::Empty(EmptyReason::NothingToApply),
    }
}

/// Merge caller params into the top level of a payload
fn merge_params(payload: &mut Value, params: Value) {
    match (payload.as_object_mut(), params) {
        (Some(payload), Value::Object(params)) => payload.extend(params),
        (_, Value::Null) => {}
        (_, other) => debug!("Ignoring save params that are not an object: {}", other),
    }
}
