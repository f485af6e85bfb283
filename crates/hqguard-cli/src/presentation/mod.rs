//! Shared CLI presentation utilities.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain decisions
//! - Anything meant for `eval` goes to stdout; diagnostics go through tracing

pub mod export;

pub use export::{ExportError, ShellFormat, print_line, render_export};
