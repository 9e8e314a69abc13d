//! Store trait for typed persistence per resource kind

use crate::core::entity::{RecordKey, Resource};
use crate::core::query::{Filter, SortOrder};
use anyhow::Result;
use async_trait::async_trait;

/// Typed persistence accessor for one resource kind
///
/// "Not found" is a value, not an error: `find_by_id` and `update` return
/// `None` and `delete` returns `false` when the key does not resolve. An `Err`
/// always means the store itself failed or refused the call.
///
/// Writes are visible to the caller once the returned future completes.
#[async_trait]
pub trait RecordStore<T: Resource>: Send + Sync {
    /// Number of records matching `filter`
    async fn count(&self, filter: &Filter) -> Result<usize>;

    /// Records matching `filter`, ordered, windowed by `offset`/`limit`
    ///
    /// `order` of `None` keeps the store's natural order. An empty result is
    /// an empty vector, never an error.
    async fn find(
        &self,
        filter: &Filter,
        order: Option<&SortOrder>,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<T>>;

    /// Get a record by key
    async fn find_by_id(&self, id: RecordKey) -> Result<Option<T>>;

    /// Insert a record under `key`, or under the next free key when `None`
    ///
    /// The store stamps the final key into the record it returns. A key that
    /// is already taken, or no free key left, is an error.
    async fn create(&self, key: Option<RecordKey>, record: T) -> Result<T>;

    /// Merge a partial update into an existing record
    ///
    /// The merge happens against the record as currently stored, and the
    /// merged record must pass [`Resource::check_invariants`] before it is
    /// written; a violation comes back as an `Err` wrapping the
    /// [`ValidationError`](crate::core::error::ValidationError).
    async fn update(&self, id: RecordKey, patch: &T::Patch) -> Result<Option<T>>;

    /// Remove a record permanently
    async fn delete(&self, id: RecordKey) -> Result<bool>;
}
