//! # Bootstrap
//!
//! Runs on contract instantiation and again on every `init` invocation, so
//! each step is idempotent:
//!
//! 1. Seed the configured accounts. An account that already exists (or
//!    fails for any other reason) is logged and skipped.
//! 2. Create the LC key index if it is missing.
//! 3. Back-fill an empty `currentStatus` to `Created` on indexed records
//!    written before statuses existed. Unreadable records are skipped.

use serde::Serialize;
use tradelc_core::{LcStatus, LedgerError, LedgerResult, StateStore};

use crate::config::ContractConfig;
use crate::index::LcKeyIndex;
use crate::registry::LcRegistry;
use crate::users::UserDirectory;

/// What a bootstrap run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// Seed accounts written by this run.
    pub accounts_created: Vec<String>,
    /// Seed accounts that were not written, with the reason.
    pub accounts_skipped: Vec<SkippedAccount>,
    /// Whether the key index had to be created.
    pub index_initialized: bool,
    /// Shipment IDs whose empty status was set to `Created`.
    pub statuses_backfilled: Vec<String>,
}

/// A seed account bootstrap did not create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAccount {
    pub username: String,
    /// Stable error code, e.g. `DUPLICATE`.
    pub code: &'static str,
}

/// Seed accounts, ensure the key index, and back-fill legacy statuses.
///
/// Only failures of the index steps abort the run.
pub fn bootstrap<S: StateStore>(store: S, config: &ContractConfig) -> LedgerResult<BootstrapReport> {
    let mut report = BootstrapReport::default();

    let users = UserDirectory::new(&store);
    for account in &config.seed_accounts {
        match users.create_user(&account.username, &account.password, &account.role) {
            Ok(_) => report.accounts_created.push(account.username.clone()),
            Err(e) => {
                tracing::warn!(username = %account.username, error = %e, "seed account skipped");
                report.accounts_skipped.push(SkippedAccount {
                    username: account.username.clone(),
                    code: e.code(),
                });
            }
        }
    }

    let index = LcKeyIndex::new(&store);
    report.index_initialized = index.ensure()?;

    let registry = LcRegistry::new(&store, config.status_field_policy);
    for shipment_id in index.keys()? {
        let mut lc = match registry.load(&shipment_id) {
            Ok(lc) => lc,
            Err(e @ (LedgerError::NotFound(_) | LedgerError::Deserialization(_))) => {
                tracing::warn!(shipment_id = %shipment_id, error = %e, "skipping unreadable LC during back-fill");
                continue;
            }
            Err(e) => return Err(e),
        };
        if lc.current_status.is_unset() {
            lc.current_status = LcStatus::Created;
            registry.save(&shipment_id, &lc)?;
            tracing::info!(shipment_id = %shipment_id, "back-filled LC status");
            report.statuses_backfilled.push(shipment_id);
        }
    }

    tracing::info!(
        created = report.accounts_created.len(),
        skipped = report.accounts_skipped.len(),
        index_initialized = report.index_initialized,
        backfilled = report.statuses_backfilled.len(),
        "bootstrap complete"
    );
    Ok(report)
}
