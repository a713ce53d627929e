
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use config::ValidationConfig;
use manifest::{Finding, Validator};
use serde::Serialize;
use tokio::task::JoinSet;

#[derive(Parser, Debug)]
#[command(next_help_heading = "Validate Options")]
#[group(id = "validate_args")]
pub struct Args {
    /// The manifest files to validate.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Also validate dependency ids, version ranges and target frameworks.
    ///
    /// Overrides `validation.strict_group_validation` from the configuration.
    #[arg(long)]
    strict: bool,

    /// How to print the findings.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// One line per finding.
    #[default]
    Text,
    /// A JSON array with one object per file.
    Json,
}

/// The findings for one file.
#[derive(Debug, Serialize)]
pub(crate) struct FileReport {
    path: PathBuf,
    findings: Vec<Finding>,
}

impl FileReport {
    fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Validates every file and prints the reports to stdout; returns whether every
/// manifest was free of findings.
pub async fn run(config: &ValidationConfig, args: Args) -> anyhow::Result<bool> {
    let mut config = config.clone();
    if args.strict {
        config = config.with_strict_groups(true);
    }

    let reports = validate_files(Validator::new(&config), args.files).await?;

    let mut stdout = std::io::stdout().lock();
    render(&reports, args.format, &mut stdout)?;

    Ok(reports.iter().all(FileReport::is_clean))
}

/// Validates the files concurrently on the blocking pool; reports come back in
/// argument order.
async fn validate_files(
    validator: Validator,
    files: Vec<PathBuf>,
) -> anyhow::Result<Vec<FileReport>> {
    let validator = Arc::new(validator);
    let mut set = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let validator = Arc::clone(&validator);
        set.spawn_blocking(move || (index, validate_file(&validator, path)));
    }

    let mut reports = Vec::with_capacity(set.len());
    while let Some(res) = set.join_next().await {
        let (index, report) = res?;
        reports.push((index, report?));
    }
    reports.sort_by_key(|(index, _)| *index);

    Ok(reports.into_iter().map(|(_, report)| report).collect())
}

fn validate_file(validator: &Validator, path: PathBuf) -> anyhow::Result<FileReport> {
    let mut file =
        File::open(&path).with_context(|| format!("could not open {}", path.display()))?;

    let (findings, _) = validator.validate(&mut file).into_parts();
    if findings.is_empty() {
        tracing::debug!(path = %path.display(), "manifest is valid");
    } else {
        tracing::info!(path = %path.display(), findings = findings.len(), "manifest has findings");
    }

    Ok(FileReport { path, findings })
}

fn render(reports: &[FileReport], format: Format, out: &mut impl Write) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        },
        Format::Text => {
            for report in reports {
                let path = report.path.display();
                if report.is_clean() {
                    writeln!(out, "{path}: ok")?;
                }
                for finding in &report.findings {
                    writeln!(out, "{path}: {}: {finding}", finding.kind())?;
                }
            }
        },
    }
    Ok(())
}
