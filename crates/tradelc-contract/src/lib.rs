//! # tradelc-contract — Letter-of-Credit Contract Logic
//!
//! The business logic the host runtime invokes. Every component reads and
//! writes through a [`tradelc_core::StateStore`] and holds no state of its
//! own between calls.
//!
//! ## Components
//!
//! - **Key index** (`index.rs`): ordered list of known shipment IDs under
//!   the reserved `LCKeys` key.
//! - **LC registry** (`registry.rs`): create, read, list, and status
//!   updates for LC records.
//! - **Document ledger** (`documents.rs`): raw document content plus the
//!   per-LC list of document names, with the automatic
//!   `ExporterDocsUploaded` transition.
//! - **User directory** (`users.rs`): account creation and login.
//! - **Bootstrap** (`bootstrap.rs`): seed accounts and index migration.
//! - **Dispatcher** (`dispatch.rs`): maps `(function, args)` from the host
//!   onto the components above, on the `invoke` and `query` surfaces.
//!
//! ## Atomicity
//!
//! Operations that write more than one key (record then index; document
//! content then record) are not transactional. Writes are ordered so that
//! an interrupted `createLC` never leaves an index entry without a record.

pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod documents;
pub mod index;
pub mod registry;
pub mod users;

pub use bootstrap::{bootstrap, BootstrapReport, SkippedAccount};
pub use config::{ConfigError, ContractConfig, SeedAccount, CONFIG_ENV};
pub use dispatch::{Chaincode, InvokeFunction, QueryFunction};
pub use documents::{DocumentLedger, UploadOutcome};
pub use index::LcKeyIndex;
pub use registry::{LcRegistry, CREATION_EVENT};
pub use users::UserDirectory;
