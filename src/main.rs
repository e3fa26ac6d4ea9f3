//! unitstore - command-line front end for compiled unit libraries
//!
//! unitstore provides:
//! - Library creation and destruction
//! - Library resolution through the search path
//! - Unit listing, inspection and storage
//! - Unified output format (jsonl/json/md)

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use unitstore::core::error::{to_exit_code, LibError};

mod cli;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err
                .downcast_ref::<LibError>()
                .map(|e| to_exit_code(e.category()))
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}
