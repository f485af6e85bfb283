//! Core domain types and port definitions for hqguard.
//!
//! This crate knows where a HyperQueue server keeps its state and how the
//! "ensure a server is running" sequence is ordered. It never spawns
//! processes itself: that is the job of the [`ServerControl`] port, which
//! `hqguard-runtime` implements on top of the `hq` binary.

pub mod config;
pub mod guard;
pub mod paths;
pub mod ports;

pub use config::{
    ConfigError, DEFAULT_ENV_VAR, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
    DEFAULT_SERVER_DIR_NAME, DEFAULT_START_DELAY, ExportedVar, GuardConfig, Readiness,
    ServerOutput, StatusScope,
};
pub use guard::{Guard, GuardError, GuardOutcome, GuardReport};
pub use paths::{
    CURRENT_DIR_NAME, PathError, STALE_FILE_NAMES, ServerLayout, ensure_directory,
    remove_stale_files,
};
pub use ports::{
    LaunchLock, LaunchedServer, ProcessError, ServerControl, ServerStatus, StartRequest,
    StopOutcome,
};
