//! `cvelint export` command handler

use std::io::Write;

use tokio_util::sync::CancellationToken;

use cvelint_core::config::CvelintConfig;
use cvelint_linter::{ExportReport, Exporter, LinterConfig};

use crate::cli::ExportArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `export` command.
pub async fn execute(
    args: ExportArgs,
    config: &CvelintConfig,
    writer: &OutputWriter,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    let repo = super::open_repository(&args.repo, config).await?;
    let exporter = Exporter::new(repo, LinterConfig::from_core(config), cancel)?;
    let report = exporter.export_to(&args.out).await?;
    writer.render(&report)?;
    Ok(())
}

impl Render for ExportReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Export: {}", self.output.display().to_string().bold())?;
        writeln!(w, "  Scanned:  {}", self.scanned)?;
        writeln!(w, "  Exported: {}", self.exported.to_string().green())?;
        Ok(())
    }
}
