//! Generic HTTP handlers shared by every resource kind
//!
//! Each handler is instantiated per kind by
//! [`ResourceDescriptor`](super::entity_registry::ResourceDescriptor). They run
//! behind the AuthCheck layer, so a [`Caller`] is always present.

use crate::core::auth::Caller;
use crate::core::entity::Resource;
use crate::core::error::ApiResult;
use crate::core::extractors::{JsonBody, RecordId};
use crate::core::query::{ListParams, Page};
use crate::core::service::ResourceService;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::collections::HashMap;

/// GET /{plural}
pub async fn list<T: Resource>(
    State(service): State<ResourceService<T>>,
) -> ApiResult<Json<Page<Value>>> {
    Ok(Json(service.list().await?))
}

/// GET /{plural}/{offset}/{limit}/{order}/{sort}/{keyword?}
pub async fn list_paginated<T: Resource>(
    State(service): State<ResourceService<T>>,
    Path(segments): Path<HashMap<String, String>>,
) -> ApiResult<Json<Page<Value>>> {
    let params = ListParams::from_segments(segments);
    Ok(Json(service.list_paginated(&params).await?))
}

/// GET /{plural}/{id}
pub async fn get_by_id<T: Resource>(
    State(service): State<ResourceService<T>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    Ok(Json(service.get_by_id(id).await?))
}

/// POST /{plural}
pub async fn create<T: Resource>(
    State(service): State<ResourceService<T>>,
    caller: Caller,
    JsonBody(draft): JsonBody<T::Draft>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let created = service.create(draft, caller.id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /{plural}/{id}
pub async fn update<T: Resource>(
    State(service): State<ResourceService<T>>,
    RecordId(id): RecordId,
    JsonBody(patch): JsonBody<T::Patch>,
) -> ApiResult<Json<Value>> {
    Ok(Json(service.update(id, patch).await?))
}

/// DELETE /{plural}/{id}
pub async fn delete<T: Resource>(
    State(service): State<ResourceService<T>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    service.delete(id).await?;
    Ok(Json(json!({ "deleted": true, "id": id })))
}
