//! REST API exposure
//!
//! Produces the final Axum `Router`: unauthenticated health checks at the
//! root, every resource router nested under the configured prefix behind the
//! AuthCheck layer, and a per-request trace span around everything.

use crate::core::auth::{AuthVerifier, require_auth};
use crate::core::error::ApiError;
use crate::server::entity_registry::EntityRegistry;
use axum::http::{Method, Uri};
use axum::middleware::from_fn_with_state;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// `custom_routes` are merged at the root, outside the AuthCheck layer,
    /// so they can host login or registration endpoints.
    pub fn build_router(
        registry: &EntityRegistry,
        verifier: Arc<dyn AuthVerifier>,
        prefix: &str,
        custom_routes: Vec<Router>,
    ) -> Router {
        let resources = registry
            .build_routes()
            .layer(from_fn_with_state(verifier, require_auth));

        let mut app = Self::health_routes();

        let prefix = prefix.trim_end_matches('/');
        app = if prefix.is_empty() {
            app.merge(resources)
        } else {
            app.nest(prefix, resources)
        };

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.fallback(Self::route_not_found)
            .layer(TraceLayer::new_for_http())
    }

    /// Unmatched paths answer with the uniform error body
    async fn route_not_found(method: Method, uri: Uri) -> ApiError {
        ApiError::no_route(method, uri.path())
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME")
        }))
    }
}
