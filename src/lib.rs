//! # Bookings
//!
//! A REST backend for room bookings, the people who make them, user accounts
//! and seasonal prices.
//!
//! ## Features
//!
//! - **Generic resource layer**: one `ResourceService` serves every kind, driven
//!   by the kind's `Resource` description
//! - **Paginated search**: `/{offset}/{limit}/{order}/{sort}/{keyword?}` with a
//!   validated sort field and a case-insensitive keyword filter
//! - **Server-stamped ownership**: the authenticated caller is written into the
//!   ownership field on create, whatever the client sent
//! - **Reference resolution**: foreign keys expand into the referenced record
//!   on single reads, private fields excluded
//! - **Request gate**: bearer-token check and id-shape check before any store
//!   access
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bookings::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(ServerConfig::from_yaml_file("bookings.yaml")?)
//!     .register(InMemoryStore::<Booking>::new())
//!     .register(InMemoryStore::<Person>::new())
//!     .register(InMemoryStore::<User>::new())
//!     .register(InMemoryStore::<Price>::new())
//!     .build()?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        auth::{AuthVerifier, Caller, JwtVerifier},
        entity::{CallerId, RecordKey, Reference, Resource},
        error::{ApiError, ApiResult},
        fetcher::EntityFetcher,
        field::FieldValue,
        query::{Filter, ListParams, Page, SortDirection, SortOrder},
        reference::{ReferenceResolver, ResolvePolicy},
        service::ResourceService,
        store::RecordStore,
    };

    // === Resource kinds ===
    pub use crate::entities::{Booking, Person, Price, User};

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::ServerConfig;

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
