//! CLI adapter for hqguard.
//!
//! `main.rs` is the composition root; everything here is reusable from
//! tests: argument parsing, bootstrap, handlers, and output rendering.
#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
pub use presentation::ShellFormat;
