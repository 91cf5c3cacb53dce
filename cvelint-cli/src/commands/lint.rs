//! `cvelint lint` command handler

use std::io::Write;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use cvelint_core::config::CvelintConfig;
use cvelint_linter::{FileFailure, LintReport, Linter, LinterConfig};

use crate::cli::LintArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `lint` command.
///
/// Runs a commit-scoped sweep when `-c` is given, a full sweep otherwise.
/// Returns `CliError::LintFailures` (exit code 4) if any file failed.
pub async fn execute(
    args: LintArgs,
    config: &CvelintConfig,
    writer: &OutputWriter,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    let mut linter_config = LinterConfig::from_core(config);
    if let Some(workers) = args.workers {
        linter_config.max_workers = workers;
    }
    let workers = linter_config.max_workers;

    let repo = super::open_repository(&args.repo, config).await?;
    let linter = Linter::new(repo, linter_config, cancel)?;

    let (scope, report) = match args.commit {
        Some(commit) => {
            let report = linter.lint_commit(&commit).await?;
            (LintScope::Commit { commit }, report)
        }
        None => {
            let report = linter.lint_all(workers).await?;
            (LintScope::Full { workers }, report)
        }
    };

    let summary = LintSummary::new(scope, &report);
    writer.render(&summary)?;

    if !report.is_clean() {
        info!(failed = report.failed, "lint finished with failures");
        return Err(CliError::LintFailures {
            failed: report.failed,
        });
    }
    Ok(())
}

/// Which documents a run covered.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LintScope {
    /// Every document in both subtrees.
    Full { workers: usize },
    /// Files added or modified by one commit.
    Commit { commit: String },
}

/// Lint run summary for output rendering.
#[derive(Debug, Serialize)]
pub struct LintSummary {
    #[serde(flatten)]
    pub scope: LintScope,
    pub successful: usize,
    pub failed: usize,
    pub modified: usize,
    pub warnings: usize,
    pub duration_ms: u64,
    pub failures: Vec<FileFailure>,
}

impl LintSummary {
    pub fn new(scope: LintScope, report: &LintReport) -> Self {
        Self {
            scope,
            successful: report.successful,
            failed: report.failed,
            modified: report.modified,
            warnings: report.warnings,
            duration_ms: u64::try_from(report.duration().as_millis()).unwrap_or(u64::MAX),
            failures: report.failures.clone(),
        }
    }
}

impl Render for LintSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.scope {
            LintScope::Full { workers } => {
                writeln!(w, "Lint Summary: {} ({} workers)", "full sweep".bold(), workers)?;
            }
            LintScope::Commit { commit } => {
                writeln!(w, "Lint Summary: commit {}", commit.bold())?;
            }
        }

        writeln!(w, "  Successful: {}", self.successful.to_string().green())?;
        if self.failed > 0 {
            writeln!(w, "  Failed:     {}", self.failed.to_string().red().bold())?;
        } else {
            writeln!(w, "  Failed:     {}", self.failed)?;
        }
        writeln!(w, "  Modified:   {}", self.modified)?;
        if self.warnings > 0 {
            writeln!(w, "  Warnings:   {}", self.warnings.to_string().yellow())?;
        } else {
            writeln!(w, "  Warnings:   {}", self.warnings)?;
        }
        writeln!(w, "  Duration:   {}ms", self.duration_ms)?;

        if !self.failures.is_empty() {
            writeln!(w)?;
            writeln!(w, "Failures:")?;
            for failure in &self.failures {
                writeln!(w, "  {} {}", failure.path.bold(), failure.error.red())?;
            }
        }

        Ok(())
    }
}
