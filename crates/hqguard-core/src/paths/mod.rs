//! Path utilities for the HyperQueue server directory.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Pure path arithmetic lives in `layout`; filesystem mutation in `ensure`
//! - No process handling here

mod ensure;
mod error;
mod layout;

pub use ensure::{ensure_directory, remove_stale_files};
pub use error::PathError;
pub use layout::{CURRENT_DIR_NAME, STALE_FILE_NAMES, ServerLayout};
