//! Shared test harness for store and HTTP-level testing
//!
//! Provides a `CountingStore` wrapper that records every call reaching the
//! wrapped store, a `FailingStore` wrapper whose chosen operations error,
//! token minting for the bearer gate, and a `TestApp` serving all four
//! resource kinds.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]

pub mod record_store_tests;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bookings::config::ServerConfig;
use bookings::core::entity::{RecordKey, Resource};
use bookings::core::query::{Filter, SortOrder};
use bookings::core::store::RecordStore;
use bookings::entities::{Booking, Person, Price, User};
use bookings::server::ServerBuilder;
use bookings::storage::InMemoryStore;

pub const SECRET: &str = "integration-secret";

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Mint an HS256 token whose subject is `caller`
pub fn token_for(caller: i64) -> String {
    token_with_secret(caller, SECRET)
}

pub fn token_with_secret(caller: i64, secret: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": caller, "exp": get_current_timestamp() + 600 }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// CountingStore: proves which requests reach the store
// ---------------------------------------------------------------------------

/// Forwards to an in-memory store and counts every call
pub struct CountingStore<T: Resource> {
    inner: InMemoryStore<T>,
    calls: Arc<AtomicUsize>,
}

impl<T: Resource> CountingStore<T> {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle on the call counter
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T: Resource> RecordStore<T> for CountingStore<T> {
    async fn count(&self, filter: &Filter) -> Result<usize> {
        self.hit();
        self.inner.count(filter).await
    }

    async fn find(
        &self,
        filter: &Filter,
        order: Option<&SortOrder>,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        self.hit();
        self.inner.find(filter, order, offset, limit).await
    }

    async fn find_by_id(&self, id: RecordKey) -> Result<Option<T>> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn create(&self, key: Option<RecordKey>, record: T) -> Result<T> {
        self.hit();
        self.inner.create(key, record).await
    }

    async fn update(&self, id: RecordKey, patch: &T::Patch) -> Result<Option<T>> {
        self.hit();
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: RecordKey) -> Result<bool> {
        self.hit();
        self.inner.delete(id).await
    }
}

// ---------------------------------------------------------------------------
// FailingStore: the store refuses chosen operations
// ---------------------------------------------------------------------------

/// Store operations a [`FailingStore`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Count,
    Find,
    FindById,
    Create,
    Update,
    Delete,
}

/// Forwards to a shared in-memory store, except for the operations in
/// `failing`, which return `"<op> failed: store unavailable"`
///
/// The inner store is shared, so tests seed data through it directly.
pub struct FailingStore<T: Resource> {
    inner: InMemoryStore<T>,
    failing: Vec<StoreOp>,
}

impl<T: Resource> FailingStore<T> {
    pub fn new(inner: InMemoryStore<T>, failing: &[StoreOp]) -> Self {
        Self {
            inner,
            failing: failing.to_vec(),
        }
    }

    fn check(&self, op: StoreOp) -> Result<()> {
        if self.failing.contains(&op) {
            return Err(anyhow!("{:?} failed: store unavailable", op));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Resource> RecordStore<T> for FailingStore<T> {
    async fn count(&self, filter: &Filter) -> Result<usize> {
        self.check(StoreOp::Count)?;
        self.inner.count(filter).await
    }

    async fn find(
        &self,
        filter: &Filter,
        order: Option<&SortOrder>,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        self.check(StoreOp::Find)?;
        self.inner.find(filter, order, offset, limit).await
    }

    async fn find_by_id(&self, id: RecordKey) -> Result<Option<T>> {
        self.check(StoreOp::FindById)?;
        self.inner.find_by_id(id).await
    }

    async fn create(&self, key: Option<RecordKey>, record: T) -> Result<T> {
        self.check(StoreOp::Create)?;
        self.inner.create(key, record).await
    }

    async fn update(&self, id: RecordKey, patch: &T::Patch) -> Result<Option<T>> {
        self.check(StoreOp::Update)?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: RecordKey) -> Result<bool> {
        self.check(StoreOp::Delete)?;
        self.inner.delete(id).await
    }
}

/// Serve bookings from a store whose `failing` operations error
///
/// Returns the server and the healthy store behind it, for seeding and for
/// checking that nothing was written.
pub fn failing_app(failing: &[StoreOp]) -> (TestServer, InMemoryStore<Booking>) {
    let inner = InMemoryStore::<Booking>::new();
    let router = ServerBuilder::new()
        .with_config(test_config())
        .register(FailingStore::new(inner.clone(), failing))
        .register(InMemoryStore::<Person>::new())
        .build()
        .unwrap();

    (TestServer::new(router), inner)
}

// ---------------------------------------------------------------------------
// TestApp
// ---------------------------------------------------------------------------

/// A served application plus the booking store's call counter
pub struct TestApp {
    pub server: TestServer,
    pub booking_calls: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn booking_store_calls(&self) -> usize {
        self.booking_calls.load(Ordering::SeqCst)
    }
}

pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.secret = SECRET.to_string();
    config
}

pub fn app() -> TestApp {
    app_with_config(test_config())
}

pub fn app_with_config(config: ServerConfig) -> TestApp {
    let bookings = CountingStore::<Booking>::new();
    let booking_calls = bookings.calls();

    let router = ServerBuilder::new()
        .with_config(config)
        .register(bookings)
        .register(InMemoryStore::<Person>::new())
        .register(InMemoryStore::<User>::new())
        .register(InMemoryStore::<Price>::new())
        .build()
        .unwrap();

    TestApp {
        server: TestServer::new(router),
        booking_calls,
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

pub fn booking_payload(room: i64, name_id: &str) -> Value {
    json!({
        "roomNumber": room,
        "arrivalDayNumber": 10,
        "leaveDayNumber": 12,
        "guestNumber": 2,
        "hadBreakfast": true,
        "nameId": name_id
    })
}

/// Build a booking record directly, for store-level tests
pub fn booking(room: i64, name_id: &str) -> Booking {
    Booking {
        id: 0,
        room_number: room,
        arrival_day_number: 10,
        leave_day_number: 12,
        guest_number: 2,
        had_breakfast: false,
        name_id: name_id.to_string(),
        person: None,
    }
}

/// POST a record as `caller` and return the response body
pub async fn create_as(app: &TestApp, caller: i64, path: &str, payload: Value) -> Value {
    let response = app
        .server
        .post(path)
        .authorization_bearer(token_for(caller))
        .json(&payload)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}
