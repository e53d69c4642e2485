//! # LC Key Index
//!
//! The store has no secondary indexes, so the set of known shipment IDs is
//! kept as a JSON array under the reserved [`LC_KEYS`] key. Order is
//! insertion order and is the order `getAllLCs` returns records in.
//!
//! ## Invariant
//!
//! Every indexed ID has an LC record. [`LcKeyIndex::add`] refuses IDs whose
//! record is not yet stored, so callers must persist the record first. The
//! index key itself is never a shipment ID or username.

use tradelc_core::{LedgerError, LedgerResult, StateStore, StoreError, LC_KEYS};

/// Handle over the reserved index key.
#[derive(Debug, Clone)]
pub struct LcKeyIndex<S> {
    store: S,
}

impl<S: StateStore> LcKeyIndex<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All indexed shipment IDs, in insertion order. A missing index reads
    /// as empty.
    pub fn keys(&self) -> LedgerResult<Vec<String>> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Whether `shipment_id` is indexed.
    pub fn contains(&self, shipment_id: &str) -> LedgerResult<bool> {
        Ok(self.keys()?.iter().any(|k| k == shipment_id))
    }

    /// Append `shipment_id` unless already present. Returns `true` if the
    /// index changed.
    pub fn add(&self, shipment_id: &str) -> LedgerResult<bool> {
        if shipment_id == LC_KEYS {
            return Err(LedgerError::Validation(format!(
                "{LC_KEYS} cannot index itself"
            )));
        }
        if !record_exists(&self.store, shipment_id)? {
            return Err(LedgerError::NotFound(format!(
                "cannot index {shipment_id}: no LC record stored"
            )));
        }
        let mut keys = self.keys()?;
        if keys.iter().any(|k| k == shipment_id) {
            return Ok(false);
        }
        keys.push(shipment_id.to_string());
        self.persist(&keys)?;
        tracing::debug!(shipment_id, size = keys.len(), "shipment indexed");
        Ok(true)
    }

    /// Create the index as an empty list if it is missing. Returns `true`
    /// if it was created.
    pub fn ensure(&self) -> LedgerResult<bool> {
        match self.load()? {
            Some(_) => Ok(false),
            None => {
                self.persist(&[])?;
                tracing::info!("initialized empty LC key index");
                Ok(true)
            }
        }
    }

    /// `None` if the key is absent or empty. A stored `null` reads as an
    /// empty list.
    fn load(&self) -> LedgerResult<Option<Vec<String>>> {
        let bytes = match self.store.get(LC_KEYS) {
            Ok(b) if b.is_empty() => return Ok(None),
            Ok(b) => b,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let keys: Option<Vec<String>> = serde_json::from_slice(&bytes).map_err(|e| {
            LedgerError::Deserialization(format!("error unmarshalling LC keys: {e}"))
        })?;
        Ok(Some(keys.unwrap_or_default()))
    }

    fn persist(&self, keys: &[String]) -> LedgerResult<()> {
        let bytes = serde_json::to_vec(keys)
            .map_err(|e| LedgerError::Write(format!("error marshalling LC keys: {e}")))?;
        self.store.put(LC_KEYS, &bytes)?;
        Ok(())
    }
}

fn record_exists<S: StateStore>(store: &S, key: &str) -> LedgerResult<bool> {
    match store.get(key) {
        Ok(bytes) => Ok(!bytes.is_empty()),
        Err(StoreError::NotFound(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
