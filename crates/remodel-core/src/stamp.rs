//! Sync timestamps
//!
//! Records are stamped whenever they are wrapped from remote data, and the
//! newest "updated" value of a type tells callers how fresh their copy is.

use chrono::{DateTime, Utc};

use crate::record::Record;
use crate::schema::EntityType;
use crate::store::MemoryStore;
use crate::value::Scalar;

/// Set the entity type's sync stamp attribute to now
///
/// Returns the stamp, or `None` if the type declares no stamp attribute.
pub fn touch_sync(record: &mut Record, entity: &EntityType) -> Option<DateTime<Utc>> {
    let attribute = entity.sync_stamp()?;
    let now = Utc::now();
    record.set(attribute, Scalar::Time(now));
    Some(now)
}

/// Newest value of the type's "updated" attribute across the store
///
/// `None` if the type has no such attribute or no record carries a value.
pub fn last_update(store: &MemoryStore, entity: &EntityType) -> Option<DateTime<Utc>> {
    let attribute = entity.updated_attribute()?;
    store
        .all(entity.id())
        .filter_map(|record| record.value(attribute)?.as_time())
        .max()
}
