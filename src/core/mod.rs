//! Core module containing the fundamental traits and types of the service

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod field;
pub mod query;
pub mod reference;
pub mod service;
pub mod store;

pub use auth::{AuthVerifier, Caller, JwtVerifier};
pub use entity::{CallerId, RecordKey, Reference, Resource};
pub use error::{ApiError, ApiResult};
pub use fetcher::{EntityFetcher, StoreFetcher};
pub use field::FieldValue;
pub use query::{Filter, ListParams, Page, QuerySpec, SortDirection, SortOrder};
pub use reference::{ReferenceResolver, ResolvePolicy};
pub use service::ResourceService;
pub use store::RecordStore;
