//! Command line interface for the manifest validator.
//!
//! Reports are written to stdout; logs, including fatal errors, go to stderr so
//! `pkglint validate --format json` can be piped straight into other tools.

mod commands;
pub mod logging;

use std::path::PathBuf;

use clap::Parser;
pub use commands::run;
pub use logging::init_global_subscriber;

/// Validate package manifests (`.nuspec`) and report every problem found.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Run as if pkglint was started in DIR
    ///
    /// Relative manifest paths given after this flag resolve against DIR. The
    /// user configuration file is still read from the platform config directory.
    #[arg(short = 'C', value_name = "DIR", global = true, value_parser = validate_path)]
    working_directory: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    command: commands::Commands,
}

/// Verbosity flags shared by every subcommand.
#[derive(Parser, Clone, Copy, Debug)]
#[command(next_help_heading = "Log Options")]
pub struct LogArgs {
    /// Log more to stderr
    ///
    /// Repeat to raise the level:
    /// 1. -v    DEBUG, one line per manifest and per skipped dependency or reference
    /// 2. -vv   TRACE, one line per rule evaluated
    ///
    /// Defaults to INFO, which logs only manifests that produced findings. A `RUST_LOG`
    /// level (e.g. `RUST_LOG=debug`) wins over this flag. Reports on stdout are never
    /// affected.
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity",
    )]
    verbosity: u8,

    /// Log less to stderr (wins over `-v` and `RUST_LOG`)
    ///
    /// 1. -q    WARN
    /// 2. -qq   ERROR, fatal errors only
    ///
    /// Findings are still printed to stdout and still set the exit code.
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
    )]
    quiet: u8,
}

fn validate_path(path: &str) -> Result<PathBuf, std::io::Error> {
    std::fs::canonicalize(path)
}

/// Collects the process arguments, entering `DIR` as soon as `-C DIR` is seen.
///
/// Entering the directory happens before argument parsing so relative manifest
/// paths resolve against it. A directory that cannot be entered is left for
/// `validate_path` to reject with a proper usage error.
pub fn change_directory() -> Vec<String> {
    enter_directory(std::env::args(), |dir| {
        std::env::set_current_dir(dir).ok();
    })
}

fn enter_directory(
    args: impl IntoIterator<Item = String>,
    mut enter: impl FnMut(&str),
) -> Vec<String> {
    let args: Vec<String> = args.into_iter().collect();
    if let Some(dir) = args
        .iter()
        .position(|arg| arg == "-C")
        .and_then(|flag| args.get(flag + 1))
    {
        enter(dir);
    }
    args
}
