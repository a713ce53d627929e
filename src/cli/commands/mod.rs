mod validate;

use std::process::ExitCode;

use clap::Subcommand;

use super::Args;

#[derive(Subcommand)]
pub(super) enum Commands {
    /// Validate one or more package manifests.
    ///
    /// Every file is checked against the full rule catalog and every problem
    /// found is reported; validation never stops at the first one.
    ///
    /// The exit code is non-zero when any manifest produced a finding.
    #[command(verbatim_doc_comment)]
    Validate(validate::Args),
}

pub async fn run(args: Args) -> anyhow::Result<ExitCode> {
    match args.command {
        Commands::Validate(args) => {
            let clean = validate::run(&config::CONFIG.validation, args).await?;
            Ok(if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        },
    }
}
