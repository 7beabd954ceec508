//! In-memory implementation of DataService for testing and development

use crate::core::{
    DataService, Record,
    error::{DeskError, DeskResult, EntityError},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory data service implementation
///
/// Ids are allocated from an atomic counter starting at 1. Unique keys
/// declared by [`Record::unique_keys`] are checked under the write lock, so
/// two concurrent inserts cannot both claim the same value.
#[derive(Clone)]
pub struct InMemoryDataService<T: Record> {
    records: Arc<RwLock<BTreeMap<i64, T>>>,
    next_id: Arc<AtomicI64>,
}

impl<T: Record> InMemoryDataService<T> {
    /// Create a new, empty in-memory data service
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl<T: Record> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T: Record>(operation: &str, e: impl std::fmt::Display) -> DeskError {
    EntityError::OperationFailed {
        entity_type: T::ENTITY.to_string(),
        operation: operation.to_string(),
        message: format!("lock poisoned: {}", e),
    }
    .into()
}

/// First unique key of `record` already held by a record other than `except`
fn find_conflict<T: Record>(
    records: &BTreeMap<i64, T>,
    record: &T,
    except: Option<i64>,
) -> Option<EntityError> {
    let keys = record.unique_keys();
    if keys.is_empty() {
        return None;
    }

    records
        .values()
        .filter(|other| Some(other.id()) != except)
        .find_map(|other| {
            let taken = other.unique_keys();
            keys.iter()
                .find(|key| taken.contains(*key))
                .map(|(field, value)| EntityError::Conflict {
                    entity_type: T::ENTITY.to_string(),
                    field: field.to_string(),
                    value: value.clone(),
                })
        })
}

#[async_trait]
impl<T: Record> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, mut record: T) -> DeskResult<T> {
        let mut records = self.records.write().map_err(|e| poisoned::<T>("create", e))?;

        if let Some(conflict) = find_conflict(&records, &record, None) {
            tracing::warn!(error = %conflict, "insert rejected");
            return Err(conflict.into());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.set_id(id);
        records.insert(id, record.clone());

        Ok(record)
    }

    async fn get(&self, id: i64) -> DeskResult<Option<T>> {
        let records = self.records.read().map_err(|e| poisoned::<T>("get", e))?;

        Ok(records.get(&id).cloned())
    }

    async fn list(&self) -> DeskResult<Vec<T>> {
        let records = self.records.read().map_err(|e| poisoned::<T>("list", e))?;

        Ok(records.values().cloned().collect())
    }

    async fn update(&self, id: i64, mut record: T) -> DeskResult<T> {
        let mut records = self.records.write().map_err(|e| poisoned::<T>("update", e))?;

        if !records.contains_key(&id) {
            return Err(EntityError::NotFound {
                entity_type: T::ENTITY.to_string(),
                id,
            }
            .into());
        }
        if let Some(conflict) = find_conflict(&records, &record, Some(id)) {
            tracing::warn!(error = %conflict, id, "update rejected");
            return Err(conflict.into());
        }

        record.set_id(id);
        records.insert(id, record.clone());

        Ok(record)
    }

    async fn delete(&self, id: i64) -> DeskResult<()> {
        let mut records = self.records.write().map_err(|e| poisoned::<T>("delete", e))?;

        records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| {
                EntityError::NotFound {
                    entity_type: T::ENTITY.to_string(),
                    id,
                }
                .into()
            })
    }
}
