//! Subcommands of `hqguard`.

use clap::Subcommand;

/// Available commands. Running `hqguard` with none behaves like `ensure`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HyperQueue server unless one is running, then print the export line
    Ensure,

    /// Report whether the HyperQueue server is running (exit 1 if not)
    Status,

    /// Stop the HyperQueue server in the server directory
    Stop,

    /// Print the export line without touching the server
    Env,

    /// Ensure the server, then run a command with the variable exported
    Exec {
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },

    /// Show resolved paths for the server directory and hq binary
    Paths,
}
