//! Generic CRUD orchestration shared by every resource kind

use crate::core::entity::{CallerId, RecordKey, Resource, stamp_owner, to_public_json};
use crate::core::error::{ApiError, ApiResult};
use crate::core::query::{Filter, ListParams, Page, QuerySpec};
use crate::core::reference::{ReferenceResolver, ResolvePolicy};
use crate::core::store::RecordStore;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

/// CRUD operations over one resource kind
///
/// Composes the kind's [`RecordStore`], the list-parameter validation in
/// [`QuerySpec`] and the [`ReferenceResolver`]. Responses are JSON values
/// because a resolved reference replaces a key with a whole record.
pub struct ResourceService<T: Resource> {
    store: Arc<dyn RecordStore<T>>,
    resolver: Arc<ReferenceResolver>,
    policy: ResolvePolicy,
}

impl<T: Resource> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            resolver: self.resolver.clone(),
            policy: self.policy,
        }
    }
}

impl<T: Resource> ResourceService<T> {
    pub fn new(
        store: Arc<dyn RecordStore<T>>,
        resolver: Arc<ReferenceResolver>,
        policy: ResolvePolicy,
    ) -> Self {
        Self {
            store,
            resolver,
            policy,
        }
    }

    async fn render(&self, record: &T, resolve: bool) -> ApiResult<Value> {
        if resolve {
            Ok(self.resolver.resolve(record).await?)
        } else {
            Ok(to_public_json(record)?)
        }
    }

    async fn render_all(&self, records: &[T]) -> ApiResult<Vec<Value>> {
        if self.policy.on_list {
            return Ok(self.resolver.resolve_all(records).await?);
        }
        records
            .iter()
            .map(|r| to_public_json(r).map_err(ApiError::from))
            .collect()
    }

    /// The whole collection, in store order
    pub async fn list(&self) -> ApiResult<Page<Value>> {
        let count = self.store.count(&Filter::All).await?;
        let records = self.store.find(&Filter::All, None, 0, None).await?;
        tracing::debug!(resource = T::resource_name(), count, "listed records");

        Ok(Page {
            count,
            items: self.render_all(&records).await?,
        })
    }

    /// One filtered, sorted window of the collection
    ///
    /// `count` is computed on the same filter as the page and ignores the
    /// window. Parameters are fully validated before the store is touched.
    pub async fn list_paginated(&self, params: &ListParams) -> ApiResult<Page<Value>> {
        let spec = QuerySpec::build::<T>(params)?;

        let count = self.store.count(&spec.filter).await?;
        let records = self
            .store
            .find(&spec.filter, Some(&spec.order), spec.offset, Some(spec.limit))
            .await?;
        tracing::debug!(
            resource = T::resource_name(),
            count,
            offset = spec.offset,
            limit = spec.limit,
            order = %spec.order.field,
            "listed page"
        );

        Ok(Page {
            count,
            items: self.render_all(&records).await?,
        })
    }

    async fn find_existing(&self, id: RecordKey) -> ApiResult<T> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(T::resource_name_singular(), id))
    }

    pub async fn get_by_id(&self, id: RecordKey) -> ApiResult<Value> {
        let record = self.find_existing(id).await?;
        self.render(&record, self.policy.on_single_read).await
    }

    /// Create a record attributed to `caller`
    ///
    /// The ownership field, if the kind has one, always holds `caller`.
    pub async fn create(&self, draft: T::Draft, caller: CallerId) -> ApiResult<Value> {
        draft.validate()?;
        let key = T::requested_id(&draft);
        let record = stamp_owner(T::from_draft(draft), caller)?;
        record.check_invariants()?;

        let created = self.store.create(key, record).await?;
        tracing::info!(
            resource = T::resource_name(),
            id = created.id(),
            caller,
            "record created"
        );

        self.render(&created, self.policy.on_single_read).await
    }

    /// Merge `patch` into the record; absent fields keep their value
    ///
    /// Record invariants are checked by the store against the record it
    /// holds at write time, so concurrent patches cannot combine into an
    /// invalid record.
    pub async fn update(&self, id: RecordKey, patch: T::Patch) -> ApiResult<Value> {
        patch.validate()?;

        let updated = self
            .store
            .update(id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found(T::resource_name_singular(), id))?;
        tracing::info!(resource = T::resource_name(), id, "record updated");

        self.render(&updated, false).await
    }

    pub async fn delete(&self, id: RecordKey) -> ApiResult<()> {
        if !self.store.delete(id).await? {
            return Err(ApiError::not_found(T::resource_name_singular(), id));
        }
        tracing::info!(resource = T::resource_name(), id, "record deleted");
        Ok(())
    }
}
