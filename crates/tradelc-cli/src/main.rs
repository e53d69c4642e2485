//! # tradelc CLI entry point
//!
//! Parses command-line arguments, loads the contract configuration, and
//! dispatches to the ledger subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tradelc_cli::ledger::{run_events, run_init, run_invoke, run_query, CallArgs};
use tradelc_cli::DEFAULT_STATE_DIR;
use tradelc_contract::ContractConfig;

/// Letter-of-Credit workflow ledger.
///
/// Runs the LC contract against a local state file. Each command is one
/// transaction.
#[derive(Parser, Debug)]
#[command(name = "tradelc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a contract configuration file (YAML). Falls back to
    /// `$TRADELC_CONFIG`, then built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the ledger state file.
    #[arg(long, global = true, default_value = DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed accounts and initialize the LC key index.
    Init,

    /// Call a function on the mutating surface.
    Invoke(CallArgs),

    /// Call a function on the read-only surface and print the result.
    Query(CallArgs),

    /// Print events emitted by past transactions.
    Events,
}

/// Log filter for a `-v` count.
fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(state_dir = %cli.state_dir.display(), "tradelc starting");

    let result = ContractConfig::load(cli.config.as_deref())
        .context("failed to load contract configuration")
        .and_then(|config| match &cli.command {
            Commands::Init => run_init(&cli.state_dir, config),
            Commands::Invoke(args) => run_invoke(args, &cli.state_dir, config),
            Commands::Query(args) => run_query(args, &cli.state_dir, config),
            Commands::Events => run_events(&cli.state_dir),
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
