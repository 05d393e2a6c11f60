//! Save action and target locations

use crate::error::{WrapperError, WrapperResult};
use crate::record::Record;
use crate::schema::Schema;
use crate::transport::Method;

/// What a save does remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    /// POST to the collection location (or the record's own)
    Create,
    /// PUT to the member location
    Update,
}

impl SaveAction {
    pub fn method(self) -> Method {
        match self {
            SaveAction::Create => Method::Post,
            SaveAction::Update => Method::Put,
        }
    }
}

/// Create for records never saved locally, update for saved records with an id
///
/// A saved record without an id fails with `ActionNotImplemented`.
pub fn save_action(schema: &Schema, record: &Record) -> WrapperResult<SaveAction> {
    if record.is_new() {
        Ok(SaveAction::Create)
    } else if record.id().is_some() {
        Ok(SaveAction::Update)
    } else {
        Err(WrapperError::ActionNotImplemented {
            entity: schema.entity(record.entity()).name().to_string(),
        })
    }
}

/// Target of a save: the record's own location if set, else the collection
/// for create and the member for update
pub fn save_location(schema: &Schema, record: &Record, action: SaveAction) -> WrapperResult<String> {
    match action {
        SaveAction::Create => {
            let collection = schema.require_location(record.entity())?;
            Ok(record.location().map(str::to_string).unwrap_or(collection))
        }
        SaveAction::Update => member_location(schema, record),
    }
}

/// Location of one record: its own override, else `<collection>/<id>`
///
/// The entity type must still have a collection location. Without an
/// override, a record without an id has no member location.
pub fn member_location(schema: &Schema, record: &Record) -> WrapperResult<String> {
    let collection = schema.require_location(record.entity())?;
    if let Some(location) = record.location() {
        return Ok(location.to_string());
    }
    match record.id() {
        Some(id) => Ok(format!("{}/{}", collection.trim_end_matches('/'), id)),
        None => Err(WrapperError::ActionNotImplemented {
            entity: schema.entity(record.entity()).name().to_string(),
        }),
    }
}
