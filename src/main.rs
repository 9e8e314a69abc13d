//! bookings-server: serves every resource kind from in-memory stores
//!
//! Configuration is read from the YAML file named by `BOOKINGS_CONFIG`
//! (defaults otherwise); `BOOKINGS_JWT_SECRET` overrides `auth.secret`.

use anyhow::Result;
use bookings::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log.level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bind = config.bind.clone();
    tracing::info!(prefix = %config.prefix, "starting bookings server");

    ServerBuilder::new()
        .with_config(config)
        .register(InMemoryStore::<Booking>::new())
        .register(InMemoryStore::<Person>::new())
        .register(InMemoryStore::<User>::new())
        .register(InMemoryStore::<Price>::new())
        .serve(&bind)
        .await
}
