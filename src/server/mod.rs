//! Server module for building HTTP servers with auto-registered routes
//!
//! `ServerBuilder` collects record stores per resource kind and produces a
//! router serving the CRUD, paginated list and health routes.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod handlers;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry, ResourceDescriptor};
