//! # File Store
//!
//! A [`StateStore`] backed by a single JSON file:
//!
//! ```json
//! { "entries": { "<key>": "<value>" }, "events": [ ... ] }
//! ```
//!
//! The file is read once on [`FileStore::open`]. Reads and writes then go
//! to memory, and [`FileStore::commit`] writes everything back. One process
//! is one transaction, identified by a fresh UUID.
//!
//! Values are stored as strings, so only UTF-8 values can be written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tradelc_core::{EmittedEvent, StateStore, StoreError};

/// File name of the state file inside the state directory.
pub const STATE_FILE: &str = "state.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
    #[serde(default)]
    events: Vec<EmittedEvent>,
}

/// JSON-file-backed state store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<StateFile>,
    tx_id: String,
}

impl FileStore {
    /// Open the state file in `state_dir`. A missing file is an empty store.
    pub fn open(state_dir: &Path) -> Result<Self> {
        let path = state_dir.join(STATE_FILE);
        let state = if path.is_file() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            StateFile::default()
        };
        let tx_id = Uuid::new_v4().to_string();
        tracing::debug!(path = %path.display(), tx_id = %tx_id, "opened state file");
        Ok(Self {
            path,
            state: RwLock::new(state),
            tx_id,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current state back to disk, creating the directory if
    /// needed.
    pub fn commit(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create state directory {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&*self.state.read())?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), tx_id = %self.tx_id, "committed state file");
        Ok(())
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.state.read().events.clone()
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.state.read().entries.keys().cloned().collect()
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.state
            .read()
            .entries
            .get(key)
            .map(|v| v.as_bytes().to_vec())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let value = String::from_utf8(value.to_vec()).map_err(|_| StoreError::Write {
            key: key.to_string(),
            reason: "file store only holds UTF-8 values".to_string(),
        })?;
        self.state.write().entries.insert(key.to_string(), value);
        Ok(())
    }

    fn emit_event(&self, name: &str, payload: &[u8]) {
        let event = EmittedEvent::new(name, payload, self.tx_id.clone());
        tracing::debug!(event = %event.name, tx_id = %event.tx_id, "event recorded");
        self.state.write().events.push(event);
    }

    fn tx_id(&self) -> String {
        self.tx_id.clone()
    }
}
