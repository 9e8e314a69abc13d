//! Entity registry for managing resource descriptors and generating CRUD routes

use crate::core::entity::Resource;
use crate::core::service::ResourceService;
use crate::server::handlers;
use axum::Router;
use axum::routing::get;
use std::collections::BTreeMap;

/// Trait that describes how to build routes for a resource kind
pub trait EntityDescriptor: Send + Sync {
    /// The plural form used in URLs (e.g., "bookings")
    fn plural(&self) -> &str;

    /// Build the routes for this kind
    ///
    /// - GET/POST `/{plural}`
    /// - GET/PATCH/DELETE `/{plural}/{id}`
    /// - GET `/{plural}/{offset}/{limit}/{order}/{sort}/{keyword?}`, the
    ///   offset being captured as `id`
    fn build_routes(&self) -> Router;
}

/// Descriptor serving any [`Resource`] through a [`ResourceService`]
pub struct ResourceDescriptor<T: Resource> {
    service: ResourceService<T>,
}

impl<T: Resource> ResourceDescriptor<T> {
    pub fn new(service: ResourceService<T>) -> Self {
        Self { service }
    }
}

impl<T: Resource> EntityDescriptor for ResourceDescriptor<T> {
    fn plural(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self) -> Router {
        let base = format!("/{}", T::resource_name());
        let page = format!("{base}/{{id}}/{{limit}}/{{order}}/{{sort}}");

        Router::new()
            .route(
                &base,
                get(handlers::list::<T>).post(handlers::create::<T>),
            )
            .route(
                &format!("{base}/{{id}}"),
                get(handlers::get_by_id::<T>)
                    .patch(handlers::update::<T>)
                    .delete(handlers::delete::<T>),
            )
            .route(&page, get(handlers::list_paginated::<T>))
            .route(&format!("{page}/"), get(handlers::list_paginated::<T>))
            .route(
                &format!("{page}/{{keyword}}"),
                get(handlers::list_paginated::<T>),
            )
            .with_state(self.service.clone())
    }
}

/// Registry for all resource kinds served by the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register a descriptor, keyed by its plural name
    ///
    /// Returns `false` when the name was already taken; the first
    /// registration is kept.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) -> bool {
        let plural = descriptor.plural().to_string();
        if self.descriptors.contains_key(&plural) {
            return false;
        }
        self.descriptors.insert(plural, descriptor);
        true
    }

    /// Build a router with all registered routes
    pub fn build_routes(&self) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            router = router.merge(descriptor.build_routes());
        }

        router
    }

    /// Plural names of every registered kind, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
