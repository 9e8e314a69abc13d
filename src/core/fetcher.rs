//! Type-erased record lookup used to resolve references across kinds

use crate::core::entity::{RecordKey, Resource, to_public_json};
use crate::core::store::RecordStore;
use anyhow::Result;
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

/// Trait for fetching records dynamically
///
/// This allows a record of one kind to be enriched with a record of another
/// kind without knowing the concrete type at compile time.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    /// Fetch a record by key and return its public JSON form
    ///
    /// Returns `Ok(None)` when no record has that key.
    async fn fetch_as_json(&self, id: RecordKey) -> Result<Option<serde_json::Value>>;
}

/// [`EntityFetcher`] backed by a typed [`RecordStore`]
pub struct StoreFetcher<T: Resource> {
    store: Arc<dyn RecordStore<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> StoreFetcher<T> {
    pub fn new(store: Arc<dyn RecordStore<T>>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Resource> EntityFetcher for StoreFetcher<T> {
    async fn fetch_as_json(&self, id: RecordKey) -> Result<Option<serde_json::Value>> {
        match self.store.find_by_id(id).await? {
            Some(record) => Ok(Some(to_public_json(&record)?)),
            None => Ok(None),
        }
    }
}
