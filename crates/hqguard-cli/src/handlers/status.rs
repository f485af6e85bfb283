//! Status command handler.

use std::process::ExitCode;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Print `running` or `not running`; exit 1 when not running.
pub async fn execute(ctx: &CliContext) -> Result<ExitCode, CliError> {
    let status = ctx.guard()?.status().await?;
    println!("{status}");

    Ok(if status.is_running() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
