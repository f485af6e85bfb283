//! Command handlers.
//!
//! Each handler takes a `CliContext`, does one thing, and returns the
//! process exit code. Errors bubble up as `CliError`.

pub mod ensure;
pub mod env;
pub mod exec;
pub mod paths;
pub mod status;
pub mod stop;
