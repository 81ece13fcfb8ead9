//! Output writers for profile data.
//!
//! This module handles turning profiles into bytes and files:
//! - pprof protobuf, gzip-compressed for transport and storage
//! - JSON summaries for quick inspection

pub mod json;
pub mod pprof;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use json::{read_summary, write_summary};
pub use pprof::{
    compress, decode_profile, encode_compressed, encode_profile, read_profile, write_payload,
    write_profile,
};

/// Validate that an output path is usable
///
/// **Public** - shared by all writers
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty or names a directory
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create the parent directories of `path` if they are missing
fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// Size of a written file, 0 if it cannot be read
fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
