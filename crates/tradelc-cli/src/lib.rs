//! # tradelc-cli — CLI for the LC Ledger
//!
//! Provides the `tradelc` command-line interface. The contract runs against
//! a [`file_store::FileStore`] kept in a local state directory, so a full
//! Letter-of-Credit workflow can be driven from a shell:
//!
//! ```bash
//! tradelc init
//! tradelc invoke createLC '{"shipmentId":"S1","contentDesc":"Cotton"}'
//! tradelc invoke uploadDocument S1 lc.pdf JVBERi0x
//! tradelc invoke updateStatus S1 ExporterBankApproved true
//! tradelc query getAllLCs
//! tradelc events
//! ```

pub mod file_store;
pub mod ledger;

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".tradelc";
