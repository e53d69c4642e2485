//! # tradelc-core — Foundational Types for the LC Ledger
//!
//! This crate is the leaf of the tradelc workspace. It defines the records
//! persisted by the Letter-of-Credit workflow, the error taxonomy shared by
//! every operation, the reserved storage keys, and the port through which
//! the hosting runtime supplies persistence.
//!
//! ## Key Design Principles
//!
//! 1. **The host owns persistence.** All reads and writes flow through the
//!    [`StateStore`] trait. The core never assumes transactions across
//!    multiple `put` calls.
//!
//! 2. **Wire-compatible records.** [`LetterOfCredit`] and [`User`] serialize
//!    with the camelCase field names existing callers already exchange.
//!
//! 3. **One error enum at the boundary.** Every operation fails with exactly
//!    one [`LedgerError`] kind carrying a human-readable message.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tradelc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod keys;
pub mod record;
pub mod store;

// Re-export primary types for ergonomic imports.
pub use error::{LedgerError, LedgerResult, Surface};
pub use keys::{document_key, LC_KEYS};
pub use record::{DocumentSlots, LcStatus, LetterOfCredit, User, UserProfile};
pub use store::{EmittedEvent, MemoryStore, StateStore, StoreError};
