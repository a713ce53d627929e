//! The main entry point for the pkglint CLI.

#![warn(missing_docs)]

use std::process::ExitCode;

use clap::Parser;
use pkglint::cli::{self, Args};

//================================================================================================
// Functions
//================================================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_from(cli::change_directory());
    let Args { log, .. } = args;

    let _guard = cli::init_global_subscriber(log);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Ctrl+C received, terminating...");
            ExitCode::FAILURE
        }
        res = cli::run(args) => {
            match res {
                Ok(code) => code,
                Err(e) => {
                    pkglint::fatal!(e);
                    ExitCode::FAILURE
                },
            }
        }
    }
}
