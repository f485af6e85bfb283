//! Main CLI parser and top-level argument handling.
//!
//! Every option is global so it can be given before or after the
//! subcommand, and each has an `HQGUARD_*` environment fallback.

use std::path::PathBuf;

use clap::Parser;
use hqguard_core::{DEFAULT_ENV_VAR, DEFAULT_SERVER_DIR_NAME};

use crate::commands::Commands;
use crate::presentation::ShellFormat;

/// Keep a HyperQueue server running for the current directory.
///
/// Typical use: `eval "$(hqguard)"`.
#[derive(Parser, Debug)]
#[command(name = "hqguard")]
#[command(about = "Ensure a HyperQueue server is running and export its directory")]
#[command(version)]
pub struct Cli {
    /// Directory the server directory lives in [default: current directory]
    #[arg(long, global = true, env = "HQGUARD_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// hq binary: a path, or a name looked up on PATH [default: hq]
    #[arg(long = "hq-bin", global = true, env = "HQGUARD_HQ_BIN")]
    pub hq_bin: Option<PathBuf>,

    /// Name of the server directory under the working directory
    #[arg(long, global = true, env = "HQGUARD_SERVER_DIR_NAME", default_value = DEFAULT_SERVER_DIR_NAME)]
    pub server_dir_name: String,

    /// Environment variable to export
    #[arg(long, global = true, env = "HQGUARD_ENV_VAR", default_value = DEFAULT_ENV_VAR)]
    pub env_var: String,

    /// Output format for the export line
    #[arg(long, global = true, value_enum, default_value_t = ShellFormat::Sh)]
    pub format: ShellFormat,

    /// Poll the server until it answers instead of sleeping a fixed time
    #[arg(long, global = true)]
    pub wait_ready: bool,

    /// Number of readiness checks with --wait-ready
    #[arg(long, global = true, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: u32,

    /// Milliseconds between readiness checks with --wait-ready
    #[arg(long, global = true, default_value_t = 2000)]
    pub interval_ms: u64,

    /// Milliseconds to wait after starting when not polling
    #[arg(long, global = true, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Write server output to <server-dir>/server.log instead of discarding it
    #[arg(long, global = true)]
    pub server_log: bool,

    /// Do not remove stale access-token/lock/server.pid files before starting
    #[arg(long, global = true)]
    pub keep_stale: bool,

    /// Query status against the server directory instead of hq's default location
    #[arg(long, global = true)]
    pub status_in_server_dir: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
