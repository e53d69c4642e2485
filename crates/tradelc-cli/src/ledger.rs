//! # Ledger Subcommands
//!
//! `init`, `invoke`, `query` and `events` against the state file in the
//! state directory.
//!
//! A successful `init` or `invoke` commits the state file. A rejected
//! invocation leaves the file untouched, the same way the host discards a
//! failed transaction.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use tradelc_contract::{Chaincode, ContractConfig};
use tradelc_core::{LedgerError, StateStore};

use crate::file_store::FileStore;

/// Exit code for an invocation the ledger rejected.
pub const EXIT_REJECTED: u8 = 2;

/// A contract function call.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Function name (e.g. `createLC`, `getAllLCs`).
    pub function: String,

    /// Positional string arguments passed to the function.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Run bootstrap and print the report.
pub fn run_init(state_dir: &Path, config: ContractConfig) -> Result<u8> {
    let chaincode = Chaincode::new(FileStore::open(state_dir)?, config);
    let report = match chaincode.init() {
        Ok(report) => report,
        Err(e) => return Ok(rejected(&e)),
    };
    chaincode.store().commit()?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("OK: ledger initialized at {}", chaincode.store().path().display());
    Ok(0)
}

/// Call a function on the mutating surface.
pub fn run_invoke(args: &CallArgs, state_dir: &Path, config: ContractConfig) -> Result<u8> {
    let chaincode = Chaincode::new(FileStore::open(state_dir)?, config);
    let output = match chaincode.invoke(&args.function, args.args.as_slice()) {
        Ok(output) => output,
        Err(e) => return Ok(rejected(&e)),
    };
    chaincode.store().commit()?;

    if let Some(bytes) = output {
        println!("{}", String::from_utf8_lossy(&bytes));
    }
    println!(
        "OK: {} committed in transaction {}",
        args.function,
        chaincode.store().tx_id()
    );
    Ok(0)
}

/// Call a function on the query surface and print the result.
pub fn run_query(args: &CallArgs, state_dir: &Path, config: ContractConfig) -> Result<u8> {
    let chaincode = Chaincode::new(FileStore::open(state_dir)?, config);
    match chaincode.query(&args.function, args.args.as_slice()) {
        Ok(bytes) => {
            println!("{}", String::from_utf8_lossy(&bytes));
            Ok(0)
        }
        Err(e) => Ok(rejected(&e)),
    }
}

/// Print every recorded event, oldest first.
pub fn run_events(state_dir: &Path) -> Result<u8> {
    let store = FileStore::open(state_dir)?;
    let events = store.events();
    if events.is_empty() {
        println!("No events recorded.");
        return Ok(0);
    }
    println!("Events ({}):", events.len());
    for event in events {
        println!(
            "  {} [{}] {}: {}",
            event.emitted_at.to_rfc3339(),
            event.tx_id,
            event.name,
            event.payload
        );
    }
    Ok(0)
}

fn rejected(err: &LedgerError) -> u8 {
    eprintln!("ERROR [{}]: {err}", err.code());
    EXIT_REJECTED
}
