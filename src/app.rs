//! Binary glue: configuration, the run, and the report.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextReport};
use crate::pipeline::{Deduplicator, RunSummary};
use crate::progress::Progress;

/// Run the command described by `cli` and report the result on stdout.
///
/// Logging must already be initialised.
///
/// # Errors
///
/// Invalid configuration, or any error that aborts the run. File-level
/// failures are not errors; they only affect the exit code under
/// `--strict`.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::from_command(&cli.command)?;
    let json = config.output == OutputFormat::Json;
    if cli.no_color || json {
        yansi::disable();
    }

    let directory = cli.command.path();
    log::info!(
        "Processing {} ({} policy, pattern '{}'){}",
        directory.display(),
        config.policy,
        config.pattern,
        if config.dry_run { ", dry run" } else { "" }
    );

    let strict = config.strict;
    let progress = Arc::new(Progress::new(cli.quiet || json));
    let mut deduplicator = Deduplicator::new(config).with_progress(progress);
    let summary = deduplicator.run(directory)?;

    let code = exit_code_for(&summary, strict);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        JsonOutput::new(&summary, code)
            .write_to(&mut out)
            .context("failed to write JSON report")?;
    } else if !cli.quiet {
        TextReport::new(&summary)
            .write_to(&mut out)
            .context("failed to write report")?;
    }
    out.flush().context("failed to flush stdout")?;

    if code == ExitCode::PartialFailure {
        log::error!(
            "{} file(s) could not be processed",
            summary.failure_count()
        );
    }
    Ok(code)
}

/// Exit code for a completed run.
#[must_use]
pub fn exit_code_for(summary: &RunSummary, strict: bool) -> ExitCode {
    if strict && summary.has_failures() {
        ExitCode::PartialFailure
    } else {
        ExitCode::Success
    }
}
