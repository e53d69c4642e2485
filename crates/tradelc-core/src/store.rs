//! # State Store Port
//!
//! The hosting runtime supplies persistence through [`StateStore`]: a flat
//! key-value namespace with `get`/`put`, a fire-and-forget event channel,
//! and the identifier of the transaction the current invocation runs in.
//!
//! ## Atomicity
//!
//! Each `put` stands alone. An operation that performs two writes can leave
//! the first one applied if the second fails. The host serializes mutating
//! invocations; implementations only need to be safe to share.
//!
//! [`MemoryStore`] is the in-process adapter used by tests and embedders.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by a store adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No value is stored under the key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// The value could not be persisted.
    #[error("failed to write key {key}: {reason}")]
    Write {
        /// Key being written.
        key: String,
        /// Adapter-specific failure description.
        reason: String,
    },
}

/// Host-provided persistence and event primitives.
pub trait StateStore {
    /// Read the raw bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Publish an event. Delivery is the host's concern.
    fn emit_event(&self, name: &str, payload: &[u8]);

    /// Identifier of the transaction this invocation runs in.
    fn tx_id(&self) -> String;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn emit_event(&self, name: &str, payload: &[u8]) {
        (**self).emit_event(name, payload)
    }

    fn tx_id(&self) -> String {
        (**self).tx_id()
    }
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn emit_event(&self, name: &str, payload: &[u8]) {
        (**self).emit_event(name, payload)
    }

    fn tx_id(&self) -> String {
        (**self).tx_id()
    }
}

/// An event captured by a store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    pub name: String,
    /// Payload decoded as UTF-8 (lossy).
    pub payload: String,
    pub tx_id: String,
    pub emitted_at: DateTime<Utc>,
}

impl EmittedEvent {
    /// Capture an event emitted in transaction `tx_id`.
    pub fn new(name: &str, payload: &[u8], tx_id: String) -> Self {
        Self {
            name: name.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
            tx_id,
            emitted_at: Utc::now(),
        }
    }
}

// -- In-Memory Store ----------------------------------------------------------

/// Thread-safe, cloneable in-memory store.
///
/// Clones share the same underlying state. Locks are `parking_lot` and are
/// never held across calls into ledger code.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    events: Arc<Mutex<Vec<EmittedEvent>>>,
    tx_id: Arc<RwLock<String>>,
    failing_keys: Arc<RwLock<HashSet<String>>>,
}

impl MemoryStore {
    /// Create an empty store with a fresh transaction id.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            events: Arc::new(Mutex::new(Vec::new())),
            tx_id: Arc::new(RwLock::new(Uuid::new_v4().to_string())),
            failing_keys: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Start a new transaction and return its id.
    pub fn begin_transaction(&self) -> String {
        let id = Uuid::new_v4().to_string();
        *self.tx_id.write() = id.clone();
        id
    }

    /// Make every subsequent `put` to `key` fail, simulating a host write
    /// rejection.
    pub fn fail_writes_to(&self, key: impl Into<String>) {
        self.failing_keys.write().insert(key.into());
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events.lock().clone()
    }

    /// Whether a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.failing_keys.read().contains(key) {
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: "write rejected by store".to_string(),
            });
        }
        self.data.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn emit_event(&self, name: &str, payload: &[u8]) {
        let event = EmittedEvent::new(name, payload, self.tx_id());
        tracing::debug!(event = %event.name, tx_id = %event.tx_id, "event emitted");
        self.events.lock().push(event);
    }

    fn tx_id(&self) -> String {
        self.tx_id.read().clone()
    }
}
