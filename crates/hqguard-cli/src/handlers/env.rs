//! Env command handler.

use std::process::ExitCode;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{ShellFormat, print_line, render_export};

/// Print the export line; does not look at or create the server directory.
pub fn execute(ctx: &CliContext, format: ShellFormat) -> Result<ExitCode, CliError> {
    print_line(&render_export(&ctx.exported_var(), None, format)?)?;
    Ok(ExitCode::SUCCESS)
}
