//! In-memory record store
//!
//! Holds every local record, keyed by [`RecordKey`]. Iteration order is key
//! order, i.e. the order in which records were first saved.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = MemoryStore::new();
//!
//! let mut task = Record::new(task_type).with("name", "Drinking soda");
//! store.save(&mut task);
//!
//! let same = store.find_by_id(task_type, 2);
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::record::{Record, RecordKey};
use crate::schema::EntityId;

/// In-memory store for records of every entity type
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<RecordKey, Record>,
    next_local: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Write Operations ====================

    /// Save a record, assigning a key on first save
    ///
    /// The record passed in is updated with its key, so the caller's copy and
    /// the stored copy stay identical.
    pub fn save(&mut self, record: &mut Record) -> RecordKey {
        let key = match record.key() {
            Some(key) => key,
            None => {
                self.next_local += 1;
                let key = RecordKey {
                    entity: record.entity(),
                    local: self.next_local,
                };
                record.assign_key(key);
                debug!("Stored new record {}", key);
                key
            }
        };
        self.records.insert(key, record.clone());
        key
    }

    /// Delete a record, returning it if it was stored
    pub fn delete(&mut self, key: RecordKey) -> Option<Record> {
        self.records.remove(&key)
    }

    /// Delete every record of an entity type
    pub fn delete_all(&mut self, entity: EntityId) -> usize {
        let before = self.records.len();
        self.records.retain(|key, _| key.entity != entity);
        before - self.records.len()
    }

    // ==================== Queries ====================

    pub fn get(&self, key: RecordKey) -> Option<&Record> {
        self.records.get(&key)
    }

    /// Find a record by remote identity
    pub fn find_by_id(&self, entity: EntityId, id: i64) -> Option<&Record> {
        self.all(entity).find(|record| record.id() == Some(id))
    }

    /// Records whose remote identity is in `ids`, in store order
    pub fn where_id_in(&self, entity: EntityId, ids: &[i64]) -> Vec<&Record> {
        self.all(entity)
            .filter(|record| record.id().is_some_and(|id| ids.contains(&id)))
            .collect()
    }

    /// All records of an entity type, in store order
    pub fn all(&self, entity: EntityId) -> impl Iterator<Item = &Record> {
        self.records
            .values()
            .filter(move |record| record.entity() == entity)
    }

    pub fn first(&self, entity: EntityId) -> Option<&Record> {
        self.all(entity).next()
    }

    pub fn last(&self, entity: EntityId) -> Option<&Record> {
        self.all(entity).last()
    }

    pub fn count(&self, entity: EntityId) -> usize {
        self.all(entity).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK: EntityId = EntityId(0);
    const USER: EntityId = EntityId(1);

    #[test]
    fn test_save_assigns_key_once() {
        let mut store = MemoryStore::new();
        let mut task = Record::new(TASK).with("name", "Cleaning up the closet");

        let key = store.save(&mut task);
        assert_eq!(task.key(), Some(key));
        assert!(!task.is_new());

        task.set("name", "Drinking soda");
        let again = store.save(&mut task);
        assert_eq!(key, again);
        assert_eq!(store.count(TASK), 1);
        assert_eq!(store.get(key), Some(&task));
    }

    #[test]
    fn test_find_by_id() {
        let mut store = MemoryStore::new();
        store.save(&mut Record::new(TASK).with("id", 22));
        store.save(&mut Record::new(USER).with("id", 22));

        let task = store.find_by_id(TASK, 22).unwrap();
        assert_eq!(task.entity(), TASK);
        assert!(store.find_by_id(TASK, 33).is_none());
    }

    #[test]
    fn test_where_id_in_uses_store_order() {
        let mut store = MemoryStore::new();
        store.save(&mut Record::new(TASK).with("id", 2));
        store.save(&mut Record::new(TASK).with("id", 1));
        store.save(&mut Record::new(TASK).with("id", 3));
        store.save(&mut Record::new(TASK));

        let ids: Vec<i64> = store
            .where_id_in(TASK, &[1, 2])
            .iter()
            .filter_map(|record| record.id())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_first_last() {
        let mut store = MemoryStore::new();
        store.save(&mut Record::new(TASK).with("id", 22));
        store.save(&mut Record::new(TASK).with("id", 33));

        assert_eq!(store.first(TASK).and_then(Record::id), Some(22));
        assert_eq!(store.last(TASK).and_then(Record::id), Some(33));
        assert!(store.first(USER).is_none());
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        let mut task = Record::new(TASK);
        let key = store.save(&mut task);
        store.save(&mut Record::new(USER));

        assert!(store.delete(key).is_some());
        assert!(store.delete(key).is_none());
        assert_eq!(store.count(TASK), 0);

        assert_eq!(store.delete_all(USER), 1);
        assert!(store.is_empty());
    }
}
