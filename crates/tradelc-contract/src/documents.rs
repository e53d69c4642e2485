//! # Document Ledger
//!
//! Stores document content under `<shipmentId>_<documentName>` and records
//! the document name on the LC. Once an LC has `threshold` documents the
//! `ExporterDocsUploaded=true` transition is applied before the record is
//! written back.
//!
//! The content write happens first and is unconditional. If the LC cannot
//! be read, the content stays stored and the name is not recorded.

use tradelc_core::{document_key, LedgerError, LedgerResult, StateStore};
use tradelc_state::StatusField;

use crate::registry::LcRegistry;

/// What an upload did beyond storing the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The LC could not be read; only the content was stored.
    ContentOnly,
    /// The name was appended to the LC.
    Recorded {
        /// Number of document names now on the LC.
        documents: usize,
        /// Whether this upload triggered `ExporterDocsUploaded`.
        docs_uploaded: bool,
    },
}

/// Document content and bookkeeping.
#[derive(Debug, Clone)]
pub struct DocumentLedger<S> {
    store: S,
    threshold: usize,
}

impl<S: StateStore> DocumentLedger<S> {
    /// Ledger that marks exporter documents as uploaded once an LC has
    /// `threshold` documents.
    pub fn new(store: S, threshold: usize) -> Self {
        Self { store, threshold }
    }

    /// Store `content` and record `document_name` on the LC.
    pub fn upload(
        &self,
        shipment_id: &str,
        document_name: &str,
        content: &str,
    ) -> LedgerResult<UploadOutcome> {
        let key = document_key(shipment_id, document_name);
        self.store.put(&key, content.as_bytes())?;
        tracing::info!(shipment_id, document_name, bytes = content.len(), "document stored");

        // The transition applied here is always well-formed, so the policy
        // is irrelevant.
        let registry = LcRegistry::new(&self.store, Default::default());
        let mut lc = match registry.load(shipment_id) {
            Ok(lc) => lc,
            Err(e) => {
                tracing::warn!(shipment_id, error = %e, "LC unreadable; document name not recorded");
                return Ok(UploadOutcome::ContentOnly);
            }
        };

        lc.document_names.push(document_name.to_string());
        let docs_uploaded = lc.document_names.len() >= self.threshold;
        if docs_uploaded {
            StatusField::ExporterDocsUploaded.apply(&mut lc, true);
            tracing::info!(shipment_id, documents = lc.document_names.len(), "exporter documents complete");
        }
        registry.save(shipment_id, &lc)?;

        Ok(UploadOutcome::Recorded {
            documents: lc.document_names.len(),
            docs_uploaded,
        })
    }

    /// Content stored for a document.
    pub fn view(&self, shipment_id: &str, document_name: &str) -> LedgerResult<Vec<u8>> {
        self.store
            .get(&document_key(shipment_id, document_name))
            .map_err(|_| LedgerError::NotFound(format!("file not found: {document_name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradelc_core::{LcStatus, LetterOfCredit, MemoryStore, LC_KEYS};
    use tradelc_state::StatusFieldPolicy;

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        LcRegistry::new(&store, StatusFieldPolicy::Strict)
            .create_lc(r#"{"shipmentId":"S1","contentDesc":"Coffee"}"#)
            .unwrap();
        store
    }

    fn lc(store: &MemoryStore) -> LetterOfCredit {
        LetterOfCredit::from_json(&store.get("S1").unwrap()).unwrap()
    }

    #[test]
    fn first_upload_records_name_only() {
        let store = seeded_store();
        let ledger = DocumentLedger::new(&store, 2);
        let outcome = ledger.upload("S1", "lc.pdf", "JVBERi0x").unwrap();

        assert_eq!(
            outcome,
            UploadOutcome::Recorded {
                documents: 1,
                docs_uploaded: false
            }
        );
        let lc = lc(&store);
        assert_eq!(lc.document_names, vec!["lc.pdf"]);
        assert!(!lc.exporter_docs_uploaded);
        assert_eq!(lc.current_status, LcStatus::Created);
    }

    #[test]
    fn second_upload_marks_docs_uploaded() {
        let store = seeded_store();
        let ledger = DocumentLedger::new(&store, 2);
        ledger.upload("S1", "lc.pdf", "a").unwrap();
        let outcome = ledger.upload("S1", "bol.pdf", "b").unwrap();

        assert_eq!(
            outcome,
            UploadOutcome::Recorded {
                documents: 2,
                docs_uploaded: true
            }
        );
        let lc = lc(&store);
        assert!(lc.exporter_docs_uploaded);
        assert_eq!(lc.current_status, LcStatus::ExporterDocsUploaded);
        assert_eq!(lc.document_names, vec!["lc.pdf", "bol.pdf"]);
    }

    #[test]
    fn later_uploads_reapply_transition() {
        let store = seeded_store();
        let registry = LcRegistry::new(&store, StatusFieldPolicy::Strict);
        let ledger = DocumentLedger::new(&store, 2);
        ledger.upload("S1", "lc.pdf", "a").unwrap();
        ledger.upload("S1", "bol.pdf", "b").unwrap();
        registry.update_status("S1", "CustomsApproved", "true").unwrap();

        ledger.upload("S1", "insurance.pdf", "c").unwrap();
        assert_eq!(lc(&store).current_status, LcStatus::ExporterDocsUploaded);
        assert_eq!(lc(&store).document_names.len(), 3);
    }

    #[test]
    fn threshold_is_configurable() {
        let store = seeded_store();
        let ledger = DocumentLedger::new(&store, 1);
        ledger.upload("S1", "lc.pdf", "a").unwrap();
        assert!(lc(&store).exporter_docs_uploaded);
    }

    #[test]
    fn upload_for_unknown_lc_stores_content_only() {
        let store = MemoryStore::new();
        let ledger = DocumentLedger::new(&store, 2);
        let outcome = ledger.upload("S404", "lc.pdf", "data").unwrap();
        assert_eq!(outcome, UploadOutcome::ContentOnly);
        assert_eq!(ledger.view("S404", "lc.pdf").unwrap(), b"data");
        assert!(!store.contains("S404"));
    }

    #[test]
    fn upload_for_corrupt_lc_stores_content_only() {
        let store = MemoryStore::new();
        store.put("S1", b"not an lc").unwrap();
        let ledger = DocumentLedger::new(&store, 2);
        assert_eq!(
            ledger.upload("S1", "lc.pdf", "data").unwrap(),
            UploadOutcome::ContentOnly
        );
        assert_eq!(store.get("S1").unwrap(), b"not an lc");
    }

    #[test]
    fn upload_under_index_key_does_not_rewrite_it() {
        let store = seeded_store();
        LcRegistry::new(&store, StatusFieldPolicy::Strict)
            .create_lc(r#"{"shipmentId":"S2"}"#)
            .unwrap();
        let index_before = store.get(LC_KEYS).unwrap();
        let s1_before = store.get("S1").unwrap();

        let ledger = DocumentLedger::new(&store, 2);
        assert_eq!(
            ledger.upload(LC_KEYS, "x.pdf", "data").unwrap(),
            UploadOutcome::ContentOnly
        );
        assert_eq!(store.get(LC_KEYS).unwrap(), index_before);
        assert_eq!(store.get("S1").unwrap(), s1_before);
    }

    #[test]
    fn content_write_failure_is_write_error() {
        let store = seeded_store();
        store.fail_writes_to("S1_lc.pdf");
        let ledger = DocumentLedger::new(&store, 2);
        let err = ledger.upload("S1", "lc.pdf", "data").unwrap_err();
        assert!(matches!(err, LedgerError::Write(_)));
        assert!(lc(&store).document_names.is_empty());
    }

    #[test]
    fn record_write_failure_is_write_error_after_content_stored() {
        let store = seeded_store();
        store.fail_writes_to("S1");
        let ledger = DocumentLedger::new(&store, 2);
        let err = ledger.upload("S1", "lc.pdf", "data").unwrap_err();
        assert!(matches!(err, LedgerError::Write(_)));
        assert_eq!(ledger.view("S1", "lc.pdf").unwrap(), b"data");
    }

    #[test]
    fn view_missing_document_is_not_found() {
        let store = seeded_store();
        let ledger = DocumentLedger::new(&store, 2);
        assert!(matches!(
            ledger.view("S1", "nothing.pdf").unwrap_err(),
            LedgerError::NotFound(_)
        ));
    }
}
