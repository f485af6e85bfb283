//! Ensure command handler.

use std::process::ExitCode;

use tracing::info;

use hqguard_core::GuardOutcome;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{ShellFormat, print_line, render_export};

/// Start the server if needed and print the export line on stdout.
pub async fn execute(ctx: &CliContext, format: ShellFormat) -> Result<ExitCode, CliError> {
    let guard = ctx.guard()?;
    let report = guard.ensure_running().await?;

    match report.outcome {
        GuardOutcome::AlreadyRunning => info!("Reusing running HyperQueue server"),
        GuardOutcome::Started { pid } => info!(pid, "Started HyperQueue server"),
    }

    print_line(&render_export(
        &report.export,
        Some(&report.outcome),
        format,
    )?)?;
    Ok(ExitCode::SUCCESS)
}
