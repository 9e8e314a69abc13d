//! Reference resolution: expanding foreign keys into the records they name

use crate::core::entity::{Resource, strip_fields, to_public_json};
use crate::core::fetcher::EntityFetcher;
use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// When read paths resolve references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// get-by-id and the create echo
    pub on_single_read: bool,
    /// list and paginated list
    pub on_list: bool,
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            on_single_read: true,
            on_list: false,
        }
    }
}

/// Substitutes foreign keys with a projection of the target record
///
/// Projections never carry the target kind's private fields, nor any field
/// excluded for that kind at construction.
#[derive(Clone, Default)]
pub struct ReferenceResolver {
    fetchers: HashMap<String, Arc<dyn EntityFetcher>>,
    exclusions: HashMap<String, Vec<String>>,
}

impl ReferenceResolver {
    pub fn new(
        fetchers: HashMap<String, Arc<dyn EntityFetcher>>,
        exclusions: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            fetchers,
            exclusions,
        }
    }

    /// Serialize `record` with each of its references expanded
    ///
    /// A target that no longer exists, or whose kind has no fetcher, leaves
    /// the raw key in place. A failing fetch fails the whole call.
    pub async fn resolve<T: Resource>(&self, record: &T) -> Result<Value> {
        let mut value = to_public_json(record)?;

        for reference in record.references() {
            let Some(fetcher) = self.fetchers.get(reference.target_kind) else {
                tracing::warn!(
                    target_kind = reference.target_kind,
                    "no fetcher registered, reference left unresolved"
                );
                continue;
            };

            let Some(mut target) = fetcher.fetch_as_json(reference.target_id).await? else {
                tracing::debug!(
                    field = reference.field,
                    target_kind = reference.target_kind,
                    target_id = reference.target_id,
                    "reference target missing"
                );
                continue;
            };

            if let Some(excluded) = self.exclusions.get(reference.target_kind) {
                let fields: Vec<&str> = excluded.iter().map(String::as_str).collect();
                strip_fields(&mut target, &fields);
            }

            if let Some(obj) = value.as_object_mut() {
                obj.insert(reference.field.to_string(), target);
            }
        }

        Ok(value)
    }

    /// Serialize a batch of records, resolving each one
    pub async fn resolve_all<T: Resource>(&self, records: &[T]) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(records.len());
        for record in records {
            values.push(self.resolve(record).await?);
        }
        Ok(values)
    }
}
