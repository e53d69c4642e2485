//! # LC Registry
//!
//! Creates, reads and updates Letter-of-Credit records. Each record is
//! stored as JSON under its shipment ID and listed in the [`LcKeyIndex`].
//!
//! ## Creation
//!
//! `createLC` ignores any workflow state in the submitted payload: the
//! status is forced to `Created` and the four flags to `false`. Re-creating
//! an existing shipment overwrites the record and leaves the index as-is.

use tradelc_core::{LedgerError, LedgerResult, LetterOfCredit, StateStore, LC_KEYS};
use tradelc_state::{apply_update, StatusFieldPolicy, UpdateOutcome};

use crate::index::LcKeyIndex;

/// Event name published after a successful `createLC`.
pub const CREATION_EVENT: &str = "invokeEvt";

/// Record manager for LCs.
#[derive(Debug, Clone)]
pub struct LcRegistry<S> {
    store: S,
    policy: StatusFieldPolicy,
}

impl<S: StateStore> LcRegistry<S> {
    /// Registry with the given handling of malformed status updates.
    pub fn new(store: S, policy: StatusFieldPolicy) -> Self {
        Self { store, policy }
    }

    /// Create (or overwrite) an LC from its JSON payload.
    pub fn create_lc(&self, payload: &str) -> LedgerResult<LetterOfCredit> {
        let mut lc = LetterOfCredit::from_json(payload.as_bytes())
            .map_err(|e| LedgerError::Validation(format!("invalid LC string: {e}")))?;
        if lc.shipment_id.is_empty() {
            return Err(LedgerError::Validation(
                "LC payload has an empty shipmentId".to_string(),
            ));
        }
        if lc.shipment_id == LC_KEYS {
            return Err(LedgerError::Validation(format!(
                "shipmentId {LC_KEYS} is a reserved key"
            )));
        }
        lc.reset_workflow();

        // Record before index: an index entry must never outlive a failed
        // record write.
        self.save(&lc.shipment_id, &lc)?;
        LcKeyIndex::new(&self.store).add(&lc.shipment_id)?;

        let message = format!(
            "LC created successfully for shipmentId :{}.{}",
            lc.shipment_id,
            self.store.tx_id()
        );
        self.store.emit_event(CREATION_EVENT, message.as_bytes());

        tracing::info!(shipment_id = %lc.shipment_id, "LC created");
        Ok(lc)
    }

    /// Raw bytes stored under any key.
    pub fn read(&self, key: &str) -> LedgerResult<Vec<u8>> {
        let bytes = self.store.get(key).map_err(|_| {
            LedgerError::NotFound(format!("failed to get state for {key}"))
        })?;
        tracing::debug!(key, len = bytes.len(), "state read");
        Ok(bytes)
    }

    /// Load and decode the LC for `shipment_id`.
    pub fn load(&self, shipment_id: &str) -> LedgerResult<LetterOfCredit> {
        let bytes = self
            .store
            .get(shipment_id)
            .map_err(|_| LedgerError::NotFound(format!("LC not found: {shipment_id}")))?;
        LetterOfCredit::from_json(&bytes).map_err(|e| {
            LedgerError::Deserialization(format!("error unmarshalling LC {shipment_id}: {e}"))
        })
    }

    /// Persist `lc` under `key`, the key it was loaded from.
    pub fn save(&self, key: &str, lc: &LetterOfCredit) -> LedgerResult<()> {
        let bytes = lc
            .to_json()
            .map_err(|e| LedgerError::Write(format!("error marshalling LC: {e}")))?;
        self.store.put(key, &bytes)?;
        Ok(())
    }

    /// Every indexed LC, in index order. Fails as a whole if any indexed
    /// record is missing or malformed.
    pub fn all(&self) -> LedgerResult<Vec<LetterOfCredit>> {
        let keys = LcKeyIndex::new(&self.store).keys()?;
        let lcs = keys
            .iter()
            .map(|key| self.load(key))
            .collect::<LedgerResult<Vec<_>>>()?;
        tracing::debug!(count = lcs.len(), "loaded all LCs");
        Ok(lcs)
    }

    /// Apply a `(field, value)` status update and persist the record.
    ///
    /// Under the lenient policy a malformed update rewrites the record
    /// unchanged.
    pub fn update_status(
        &self,
        shipment_id: &str,
        field: &str,
        value: &str,
    ) -> LedgerResult<UpdateOutcome> {
        let mut lc = self.load(shipment_id)?;
        let outcome = apply_update(&mut lc, field, value, self.policy)?;
        self.save(shipment_id, &lc)?;

        match &outcome {
            UpdateOutcome::Applied { from, to, .. } => {
                tracing::info!(shipment_id, field, %from, %to, "LC status updated");
            }
            UpdateOutcome::Ignored => {
                tracing::warn!(shipment_id, field, value, "status update ignored");
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tradelc_core::{LcStatus, MemoryStore, LC_KEYS};

    fn registry(store: &MemoryStore) -> LcRegistry<&MemoryStore> {
        LcRegistry::new(store, StatusFieldPolicy::Strict)
    }

    fn payload(id: &str) -> String {
        json!({
            "shipmentId": id,
            "contentDesc": "Steel coils",
            "contentValue": 98000,
            "exporterCompany": "Anhui Steel",
            "exporterBank": "Bank of China",
            "importerCompany": "Lagos Build",
            "importerBank": "Zenith",
            "freightCompany": "COSCO",
            "portOfLoading": "CNSHA",
            "portOfEntry": "NGLOS",
            "currentStatus": "PaymentComplete",
            "exporterBankApproved": true,
            "exporterDocsUploaded": true,
            "customsApproved": true,
            "paymentComplete": true
        })
        .to_string()
    }

    // ── createLC ─────────────────────────────────────────────────────

    #[test]
    fn create_forces_created_status_and_clears_flags() {
        let store = MemoryStore::new();
        registry(&store).create_lc(&payload("S1")).unwrap();

        let stored = LetterOfCredit::from_json(&store.get("S1").unwrap()).unwrap();
        assert_eq!(stored.current_status, LcStatus::Created);
        assert!(!stored.exporter_bank_approved);
        assert!(!stored.exporter_docs_uploaded);
        assert!(!stored.customs_approved);
        assert!(!stored.payment_complete);
        assert_eq!(stored.freight_company, "COSCO");
    }

    #[test]
    fn create_indexes_shipment_once() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.create_lc(&payload("S1")).unwrap();
        reg.create_lc(&payload("S1")).unwrap();
        assert_eq!(LcKeyIndex::new(&store).keys().unwrap(), vec!["S1"]);
    }

    #[test]
    fn create_emits_event_with_tx_id() {
        let store = MemoryStore::new();
        let tx = store.begin_transaction();
        registry(&store).create_lc(&payload("S7")).unwrap();

        let events = store.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, CREATION_EVENT);
        assert_eq!(
            events[0].payload,
            format!("LC created successfully for shipmentId :S7.{tx}")
        );
    }

    #[test]
    fn create_rejects_invalid_payload() {
        let store = MemoryStore::new();
        let err = registry(&store).create_lc("{oops").unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(store.is_empty());
        assert!(store.events().is_empty());
    }

    #[test]
    fn create_rejects_empty_shipment_id() {
        let store = MemoryStore::new();
        let err = registry(&store).create_lc(r#"{"contentDesc":"x"}"#).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn create_rejects_index_key_as_shipment_id() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.create_lc(&payload("S1")).unwrap();
        let index_before = store.get(LC_KEYS).unwrap();

        let err = reg.create_lc(&payload(LC_KEYS)).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(store.get(LC_KEYS).unwrap(), index_before);
        assert_eq!(store.events().len(), 1);
        assert_eq!(reg.all().unwrap().len(), 1);
    }

    #[test]
    fn create_rejects_array_payload() {
        let store = MemoryStore::new();
        let err = registry(&store).create_lc(r#"["S9","Steel coils"]"#).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(!store.contains("S9"));
        assert!(store.is_empty());
    }

    #[test]
    fn failed_record_write_leaves_index_untouched() {
        let store = MemoryStore::new();
        store.fail_writes_to("S1");
        let err = registry(&store).create_lc(&payload("S1")).unwrap_err();
        assert!(matches!(err, LedgerError::Write(_)));
        assert!(!store.contains(LC_KEYS));
        assert!(store.events().is_empty());
    }

    #[test]
    fn failed_index_write_keeps_record() {
        let store = MemoryStore::new();
        store.fail_writes_to(LC_KEYS);
        let err = registry(&store).create_lc(&payload("S1")).unwrap_err();
        assert!(matches!(err, LedgerError::Write(_)));
        assert!(store.contains("S1"));
    }

    // ── read / load / all ────────────────────────────────────────────

    #[test]
    fn read_returns_raw_bytes() {
        let store = MemoryStore::new();
        store.put("anything", b"raw").unwrap();
        assert_eq!(registry(&store).read("anything").unwrap(), b"raw");
    }

    #[test]
    fn read_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            registry(&store).read("missing").unwrap_err(),
            LedgerError::NotFound(_)
        ));
    }

    #[test]
    fn all_returns_records_in_index_order() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.create_lc(&payload("S2")).unwrap();
        reg.create_lc(&payload("S1")).unwrap();
        let ids: Vec<String> = reg.all().unwrap().into_iter().map(|lc| lc.shipment_id).collect();
        assert_eq!(ids, vec!["S2", "S1"]);
    }

    #[test]
    fn all_with_no_index_is_empty() {
        let store = MemoryStore::new();
        assert!(registry(&store).all().unwrap().is_empty());
    }

    #[test]
    fn all_fails_whole_call_on_malformed_record() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.create_lc(&payload("S1")).unwrap();
        reg.create_lc(&payload("S2")).unwrap();
        store.put("S2", b"garbage").unwrap();
        assert!(matches!(
            reg.all().unwrap_err(),
            LedgerError::Deserialization(_)
        ));
    }

    // ── updateStatus ─────────────────────────────────────────────────

    #[test]
    fn update_status_persists_transition() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.create_lc(&payload("S1")).unwrap();
        reg.update_status("S1", "ExporterBankApproved", "true").unwrap();

        let lc = reg.load("S1").unwrap();
        assert!(lc.exporter_bank_approved);
        assert_eq!(lc.current_status, LcStatus::ExporterBankApproved);

        reg.update_status("S1", "ExporterBankApproved", "false").unwrap();
        assert_eq!(
            reg.load("S1").unwrap().current_status,
            LcStatus::ExporterBankRejected
        );
    }

    #[test]
    fn update_status_unknown_shipment_is_not_found() {
        let store = MemoryStore::new();
        let err = registry(&store)
            .update_status("nope", "CustomsApproved", "true")
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn update_status_on_corrupt_record_is_deserialization_error() {
        let store = MemoryStore::new();
        store.put("S1", b"[1,2,3]").unwrap();
        let err = registry(&store)
            .update_status("S1", "CustomsApproved", "true")
            .unwrap_err();
        assert!(matches!(err, LedgerError::Deserialization(_)));
    }

    #[test]
    fn update_status_writes_back_under_requested_key() {
        let store = MemoryStore::new();
        store
            .put("S1", br#"{"shipmentId":"OTHER","currentStatus":"Created"}"#)
            .unwrap();
        registry(&store)
            .update_status("S1", "CustomsApproved", "true")
            .unwrap();

        let lc = LetterOfCredit::from_json(&store.get("S1").unwrap()).unwrap();
        assert_eq!(lc.current_status, LcStatus::CustomsApproved);
        assert!(!store.contains("OTHER"));
    }

    #[test]
    fn update_status_on_index_key_leaves_index_intact() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.create_lc(&payload("S1")).unwrap();
        let err = reg.update_status(LC_KEYS, "CustomsApproved", "true").unwrap_err();
        assert!(matches!(err, LedgerError::Deserialization(_)));
        assert_eq!(store.get(LC_KEYS).unwrap(), br#"["S1"]"#);
    }

    #[test]
    fn strict_policy_rejects_unknown_field() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.create_lc(&payload("S1")).unwrap();
        let err = reg.update_status("S1", "Shipped", "true").unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn lenient_policy_rewrites_unchanged_record() {
        let store = MemoryStore::new();
        let reg = LcRegistry::new(&store, StatusFieldPolicy::Lenient);
        reg.create_lc(&payload("S1")).unwrap();
        let before = reg.load("S1").unwrap();
        let outcome = reg.update_status("S1", "Shipped", "true").unwrap();
        assert_eq!(outcome, UpdateOutcome::Ignored);
        assert_eq!(reg.load("S1").unwrap(), before);
    }

    // ── Properties ───────────────────────────────────────────────────

    proptest! {
        /// Whatever workflow state a payload claims, the stored record
        /// starts at `Created` with every flag cleared.
        #[test]
        fn create_always_resets_workflow(
            id in "[A-Z]{1,3}[0-9]{1,4}",
            status in "[A-Za-z]{0,20}",
            flags in any::<[bool; 4]>(),
            value in 0u32..1_000_000,
        ) {
            let store = MemoryStore::new();
            let body = json!({
                "shipmentId": id,
                "contentValue": value,
                "currentStatus": status,
                "exporterBankApproved": flags[0],
                "exporterDocsUploaded": flags[1],
                "customsApproved": flags[2],
                "paymentComplete": flags[3],
            });
            registry(&store).create_lc(&body.to_string()).unwrap();

            let stored = LetterOfCredit::from_json(&store.get(&id).unwrap()).unwrap();
            prop_assert_eq!(stored.current_status, LcStatus::Created);
            prop_assert!(!stored.exporter_bank_approved);
            prop_assert!(!stored.exporter_docs_uploaded);
            prop_assert!(!stored.customs_approved);
            prop_assert!(!stored.payment_complete);
        }
    }
}
