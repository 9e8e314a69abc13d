//! In-memory implementation of RecordStore for testing and development

use crate::core::entity::{RecordKey, Resource};
use crate::core::query::{Filter, SortOrder};
use crate::core::store::RecordStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory record store
///
/// Records are kept in key order, which is the store's natural order for
/// unsorted listings and for breaking ties when sorting. Uses RwLock for
/// thread-safe access; writes are serialized by the lock.
#[derive(Clone)]
pub struct InMemoryStore<T: Resource> {
    records: Arc<RwLock<BTreeMap<RecordKey, T>>>,
}

impl<T: Resource> InMemoryStore<T> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl<T: Resource> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject `candidate` if one of its unique fields collides with another record
fn check_unique<T: Resource>(records: &BTreeMap<RecordKey, T>, candidate: &T) -> Result<()> {
    for field in T::unique_fields() {
        let Some(value) = candidate.field_value(field).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = records.values().any(|existing| {
            existing.id() != candidate.id() && existing.field_value(field).as_ref() == Some(&value)
        });
        if taken {
            return Err(anyhow!("duplicate key: {}", field));
        }
    }
    Ok(())
}

#[async_trait]
impl<T: Resource> RecordStore<T> for InMemoryStore<T> {
    async fn count(&self, filter: &Filter) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().filter(|r| filter.matches(*r)).count())
    }

    async fn find(
        &self,
        filter: &Filter,
        order: Option<&SortOrder>,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matched: Vec<&T> = records.values().filter(|r| filter.matches(*r)).collect();
        if let Some(order) = order {
            // sort_by is stable: equal keys keep key order
            matched.sort_by(|a, b| order.compare(*a, *b));
        }

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: RecordKey) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(&id).cloned())
    }

    async fn create(&self, key: Option<RecordKey>, mut record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let key = match key {
            Some(key) if records.contains_key(&key) => {
                return Err(anyhow!("duplicate key: id {}", key));
            }
            Some(key) => key,
            None => match records.keys().next_back() {
                None => 1,
                Some(last) => last
                    .checked_add(1)
                    .ok_or_else(|| anyhow!("key space exhausted after id {}", last))?,
            },
        };
        record.set_id(key);
        check_unique(&records, &record)?;

        records.insert(key, record.clone());

        Ok(record)
    }

    async fn update(&self, id: RecordKey, patch: &T::Patch) -> Result<Option<T>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(existing) = records.get(&id) else {
            return Ok(None);
        };
        let mut merged = existing.clone();
        merged.apply_patch(patch);
        merged.check_invariants()?;
        check_unique(&records, &merged)?;

        records.insert(id, merged.clone());

        Ok(Some(merged))
    }

    async fn delete(&self, id: RecordKey) -> Result<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(records.remove(&id).is_some())
    }
}
