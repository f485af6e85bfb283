//! Stop command handler.

use std::process::ExitCode;

use hqguard_core::StopOutcome;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext) -> Result<ExitCode, CliError> {
    match ctx.guard()?.stop().await? {
        StopOutcome::Stopped => println!("stopped"),
        StopOutcome::Killed { pid } => println!("killed (PID {pid})"),
        StopOutcome::NotRunning => println!("not running"),
    }
    Ok(ExitCode::SUCCESS)
}
