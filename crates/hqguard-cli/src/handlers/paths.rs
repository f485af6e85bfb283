//! Paths command handler.
//!
//! Displays all resolved paths in `key = value` format for diagnostics.

use std::process::ExitCode;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub fn execute(ctx: &CliContext) -> Result<ExitCode, CliError> {
    println!("work_dir = {}", ctx.config.work_dir.display());
    println!("{}", ctx.layout());
    println!("env_var = {}", ctx.config.env_var);
    match ctx.hq_path() {
        Ok(path) => println!("hq_bin = {}", path.display()),
        Err(e) => println!("hq_bin = <unresolved: {e}>"),
    }
    Ok(ExitCode::SUCCESS)
}
