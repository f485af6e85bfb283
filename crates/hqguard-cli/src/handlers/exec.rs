//! Exec command handler.
//!
//! A child cannot change its parent shell's environment, so this runs the
//! requested command itself with the variable set.

use std::process::ExitCode;

use tokio::process::Command;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Ensure the server, run `command` with the variable exported, and exit
/// with its status.
pub async fn execute(ctx: &CliContext, command: &[String]) -> Result<ExitCode, CliError> {
    let Some((program, args)) = command.split_first() else {
        return Err(CliError::Config("exec needs a command to run".to_string()));
    };

    let report = ctx.guard()?.ensure_running().await?;
    debug!(
        "Running {} with {}={}",
        program,
        report.export.name,
        report.export.value.display()
    );

    let status = Command::new(program)
        .args(args)
        .env(&report.export.name, &report.export.value)
        .status()
        .await
        .map_err(|e| CliError::Exec {
            program: program.clone(),
            reason: e.to_string(),
        })?;

    Ok(ExitCode::from(exit_code_of(status)))
}

/// Child's exit code, or `128 + signal` when it was killed by one.
fn exit_code_of(status: std::process::ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(1);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(1);
        }
    }

    1
}
