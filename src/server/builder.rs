//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{EntityDescriptor, EntityRegistry, ResourceDescriptor};
use super::exposure::RestExposure;
use crate::config::ServerConfig;
use crate::core::auth::{AuthVerifier, JwtVerifier};
use crate::core::entity::Resource;
use crate::core::fetcher::{EntityFetcher, StoreFetcher};
use crate::core::reference::{ReferenceResolver, ResolvePolicy};
use crate::core::service::ResourceService;
use crate::core::store::RecordStore;
use anyhow::{Result, anyhow};
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds a resource descriptor once the shared resolver exists
type PendingDescriptor =
    Box<dyn FnOnce(Arc<ReferenceResolver>, ResolvePolicy) -> Box<dyn EntityDescriptor> + Send>;

/// Builder for creating HTTP servers with auto-registered routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .register(InMemoryStore::<Booking>::new())
///     .register(InMemoryStore::<Person>::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: ServerConfig,
    verifier: Option<Arc<dyn AuthVerifier>>,
    fetchers: HashMap<String, Arc<dyn EntityFetcher>>,
    exclusions: HashMap<String, Vec<String>>,
    pending: Vec<(&'static str, PendingDescriptor)>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            verifier: None,
            fetchers: HashMap::new(),
            exclusions: HashMap::new(),
            pending: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Use this configuration (prefix, auth secret, resolve policy)
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Verify bearer tokens with `verifier` instead of the configured
    /// JWT secret
    pub fn with_auth_verifier(mut self, verifier: impl AuthVerifier + 'static) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    /// Add custom routes, served outside the AuthCheck layer
    ///
    /// Use this for endpoints such as login or registration that must be
    /// reachable without a token.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Hide `fields` of `kind` whenever a record of that kind is resolved as
    /// a reference
    pub fn exclude_fields(mut self, kind: &str, fields: &[&str]) -> Self {
        self.exclusions
            .entry(kind.to_string())
            .or_default()
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Serve the resource kind `T` from `store`
    pub fn register<T: Resource>(self, store: impl RecordStore<T> + 'static) -> Self {
        self.register_store::<T>(Arc::new(store))
    }

    /// Serve the resource kind `T` from a shared store handle
    pub fn register_store<T: Resource>(mut self, store: Arc<dyn RecordStore<T>>) -> Self {
        self.fetchers.insert(
            T::resource_name().to_string(),
            Arc::new(StoreFetcher::new(store.clone())),
        );
        let make: PendingDescriptor =
            Box::new(move |resolver: Arc<ReferenceResolver>, policy: ResolvePolicy| {
                Box::new(ResourceDescriptor::new(ResourceService::<T>::new(
                    store, resolver, policy,
                ))) as Box<dyn EntityDescriptor>
            });
        self.pending.push((T::resource_name(), make));
        self
    }

    fn resolve_policy(&self) -> ResolvePolicy {
        ResolvePolicy {
            on_single_read: true,
            on_list: self.config.references.resolve_on_list,
        }
    }

    /// Build the final REST router
    ///
    /// Fails when no way of verifying tokens is configured, when the prefix
    /// is not an absolute path, or when a kind is registered twice.
    pub fn build(self) -> Result<Router> {
        let verifier = match self.verifier.clone() {
            Some(verifier) => verifier,
            None if !self.config.auth.secret.is_empty() => Arc::new(JwtVerifier::new(
                &self.config.auth.secret,
                self.config.auth.leeway_secs,
            )),
            None => {
                return Err(anyhow!(
                    "No auth verifier configured. Set auth.secret or call .with_auth_verifier()"
                ));
            }
        };

        let prefix = self.config.prefix.clone();
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(anyhow!("Route prefix must start with '/': {}", prefix));
        }

        let policy = self.resolve_policy();
        let resolver = Arc::new(ReferenceResolver::new(self.fetchers, self.exclusions));

        let mut registry = EntityRegistry::new();
        for (name, make) in self.pending {
            if !registry.register(make(resolver.clone(), policy)) {
                return Err(anyhow!("Resource '{}' is registered twice", name));
            }
        }
        tracing::debug!(resources = ?registry.entity_types(), prefix = %prefix, "routes built");

        Ok(RestExposure::build_router(
            &registry,
            verifier,
            &prefix,
            self.custom_routes,
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
